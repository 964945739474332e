//! HTTP handlers for the stock ledger and stock-out prediction

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::external::AiPhrasingClient;
use crate::models::PredictionResult;
use crate::services::prediction::{ForecastDefaults, PredictStockoutInput, PredictionService};
use crate::services::stock_history::{RecordHistoryInput, StockHistoryEntry, StockHistoryService};
use crate::AppState;

/// Get an item's stock ledger, ascending by date
pub async fn get_stock_history(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockHistoryEntry>>> {
    let service = StockHistoryService::new(state.db);
    let history = service.get_history(item_id).await?;
    Ok(Json(history))
}

/// Record one daily stock observation for an item
pub async fn record_stock_history(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<RecordHistoryInput>,
) -> AppResult<Json<StockHistoryEntry>> {
    let service = StockHistoryService::new(state.db);
    let entry = service.record_entry(item_id, input).await?;
    Ok(Json(entry))
}

/// Predict when an item will run out of stock.
///
/// The body is optional; a bare POST uses the configured defaults.
pub async fn predict_stockout(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    input: Option<Json<PredictStockoutInput>>,
) -> AppResult<Json<PredictionResult>> {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let ai_client = AiPhrasingClient::from_config(state.config.ai.as_ref());
    let service = PredictionService::new(
        state.db,
        ForecastDefaults::from(&state.config.inventory),
        ai_client,
    );
    let prediction = service.predict_for_item(item_id, input).await?;
    Ok(Json(prediction))
}
