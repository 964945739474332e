//! HTTP handlers for inventory item endpoints

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::item::{
    AdjustStockInput, CreateItemInput, ItemFilter, ItemService, ItemWithSupplier, UpdateItemInput,
};
use crate::AppState;
use shared::{PaginatedResponse, Pagination};

/// List one page of items, optionally filtered by status and category
pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<PaginatedResponse<ItemWithSupplier>>> {
    let service = ItemService::new(state.db, state.config.inventory.low_stock_threshold);
    let items = service.list_items(filter, pagination).await?;
    Ok(Json(items))
}

/// Get an item by ID
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ItemWithSupplier>> {
    let service = ItemService::new(state.db, state.config.inventory.low_stock_threshold);
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Create an item
pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<ItemWithSupplier>> {
    let service = ItemService::new(state.db, state.config.inventory.low_stock_threshold);
    let item = service.create_item(input).await?;
    Ok(Json(item))
}

/// Update an item
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<ItemWithSupplier>> {
    let service = ItemService::new(state.db, state.config.inventory.low_stock_threshold);
    let item = service.update_item(item_id, input).await?;
    Ok(Json(item))
}

/// Set an item's stock level
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<ItemWithSupplier>> {
    let service = ItemService::new(state.db, state.config.inventory.low_stock_threshold);
    let item = service.adjust_stock(item_id, input).await?;
    Ok(Json(item))
}

/// Delete an item
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ItemService::new(state.db, state.config.inventory.low_stock_threshold);
    service.delete_item(item_id).await?;
    Ok(Json(()))
}

/// Export the item catalog as a CSV download
pub async fn export_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> AppResult<impl IntoResponse> {
    let service = ItemService::new(state.db, state.config.inventory.low_stock_threshold);
    let csv = service.export_csv(filter).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"inventory.csv\"",
            ),
        ],
        csv,
    ))
}
