//! HTTP handlers for the dashboard summary

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::dashboard::{DashboardService, DashboardSummary};
use crate::AppState;

/// Get the dashboard summary
pub async fn get_dashboard_summary(
    State(state): State<AppState>,
) -> AppResult<Json<DashboardSummary>> {
    let service = DashboardService::new(state.db);
    let summary = service.get_summary().await?;
    Ok(Json(summary))
}
