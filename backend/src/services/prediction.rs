//! Stock-out prediction service
//!
//! Loads an item's ledger, runs the deterministic forecast core, and phrases
//! the rationale. The numeric outputs are computed locally before any
//! external call; the AI phrasing service only rewords them and is skipped
//! or falls back to the template whenever it is unavailable.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::InventoryConfig;
use crate::error::AppResult;
use crate::external::AiPhrasingClient;
use crate::services::stock_history::StockHistoryService;
use crate::models::{PredictionRequest, PredictionResult};
use shared::forecast::{format_reasoning, predict_stockout};
use shared::Language;

/// Prediction service wiring the ledger to the forecast core
#[derive(Clone)]
pub struct PredictionService {
    history: StockHistoryService,
    defaults: ForecastDefaults,
    ai_client: Option<AiPhrasingClient>,
}

/// Configured defaults for forecast parameters
#[derive(Debug, Clone, Copy)]
pub struct ForecastDefaults {
    pub lead_time_days: u32,
    pub moving_average_window: u32,
}

impl From<&InventoryConfig> for ForecastDefaults {
    fn from(config: &InventoryConfig) -> Self {
        Self {
            lead_time_days: config.default_lead_time_days,
            moving_average_window: config.default_moving_average_window,
        }
    }
}

/// Optional per-request overrides of the configured defaults
#[derive(Debug, Default, Deserialize)]
pub struct PredictStockoutInput {
    pub lead_time_days: Option<u32>,
    pub moving_average_window: Option<u32>,
    /// Language for the reasoning text, default English
    pub language: Option<Language>,
}

impl PredictionService {
    /// Create a new PredictionService instance
    pub fn new(
        db: PgPool,
        defaults: ForecastDefaults,
        ai_client: Option<AiPhrasingClient>,
    ) -> Self {
        Self {
            history: StockHistoryService::new(db),
            defaults,
            ai_client,
        }
    }

    /// Predict when an item will run out of stock
    pub async fn predict_for_item(
        &self,
        item_id: Uuid,
        input: PredictStockoutInput,
    ) -> AppResult<PredictionResult> {
        let history = self.history.history_points(item_id).await?;

        let request = PredictionRequest {
            history,
            lead_time_days: input.lead_time_days.unwrap_or(self.defaults.lead_time_days),
            moving_average_window: input
                .moving_average_window
                .unwrap_or(self.defaults.moving_average_window),
        };

        let forecast = predict_stockout(&request)?;
        let language = input.language.unwrap_or_default();

        // The templated text is always available; the AI service only
        // rephrases the same facts
        let reasoning = match &self.ai_client {
            Some(client) => match client.phrase_with_retry(&forecast.facts, language.code()).await {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(
                        "AI phrasing unavailable, using templated reasoning: {}",
                        err
                    );
                    format_reasoning(&forecast.facts)
                }
            },
            None => format_reasoning(&forecast.facts),
        };

        Ok(PredictionResult {
            predicted_out_of_stock_date: forecast.facts.predicted_out_of_stock_date,
            reorder_by_date: forecast.facts.reorder_by_date,
            confidence_level: forecast.confidence_level,
            reasoning,
            facts: forecast.facts,
        })
    }
}
