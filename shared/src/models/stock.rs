//! Stock ledger models
//!
//! One `HistoryPoint` per item per day: the closing stock level and the
//! units sold that day. The ledger feeds the stock-out forecast.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation of an item's stock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub stock_level: u32,
    pub sales: u32,
}

/// Request for a stock-out prediction over a ledger slice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Daily ledger, ascending by date, dates strictly increasing
    pub history: Vec<HistoryPoint>,
    /// Days required to receive replenishment after placing an order
    pub lead_time_days: u32,
    /// Number of trailing days used for the sales moving average
    pub moving_average_window: u32,
}

impl PredictionRequest {
    /// Recognized default lead time (days)
    pub const DEFAULT_LEAD_TIME_DAYS: u32 = 7;
    /// Recognized default moving-average window (days)
    pub const DEFAULT_MOVING_AVERAGE_WINDOW: u32 = 14;

    pub fn new(history: Vec<HistoryPoint>) -> Self {
        Self {
            history,
            lead_time_days: Self::DEFAULT_LEAD_TIME_DAYS,
            moving_average_window: Self::DEFAULT_MOVING_AVERAGE_WINDOW,
        }
    }
}

/// Result of a stock-out prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_out_of_stock_date: NaiveDate,
    /// Date by which a replenishment order must be placed to avoid stock-out
    pub reorder_by_date: NaiveDate,
    /// Heuristic confidence in [0, 1]
    pub confidence_level: f64,
    /// Human-readable explanation of the forecast
    pub reasoning: String,
    /// Numeric facts the reasoning is constrained to restate
    pub facts: crate::forecast::ForecastFacts,
}
