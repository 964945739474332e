//! Route definitions for the Stockpile backend

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Supplier management
        .nest("/suppliers", supplier_routes())
        // Item catalog, ledger, and forecasting
        .nest("/items", item_routes())
        // Dashboard
        .route("/dashboard/summary", get(handlers::get_dashboard_summary))
}

/// Supplier management routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
}

/// Item management routes
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route("/export", get(handlers::export_items))
        .route(
            "/:item_id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/:item_id/stock", put(handlers::adjust_stock))
        // Daily ledger feeding the forecast
        .route(
            "/:item_id/history",
            get(handlers::get_stock_history).post(handlers::record_stock_history),
        )
        // Stock-out prediction
        .route("/:item_id/predict", post(handlers::predict_stockout))
}
