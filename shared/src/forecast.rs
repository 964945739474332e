//! Stock-out date forecasting
//!
//! Pure, deterministic computation: a moving-average burn rate over the
//! trailing ledger window projects the date stock reaches zero. The lead
//! time never shifts the predicted date; it only frames the reorder point.
//! Text phrasing is a separate concern (`format_reasoning`), so callers can
//! swap in an external formatter without touching the numbers.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{HistoryPoint, PredictionRequest};

/// Predicted date offset when no depletion trend is measurable (~10 years)
pub const NO_DEPLETION_HORIZON_DAYS: i64 = 3650;

/// Errors from the forecast core
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForecastError {
    #[error("invalid parameter `{field}`: {message}")]
    InvalidParameter { field: &'static str, message: String },

    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

/// Numeric facts behind a forecast
///
/// Everything the reasoning text is allowed to state. An external phrasing
/// service receives exactly this struct and must restate it, never extend it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFacts {
    /// Mean units sold per day over the window actually used
    pub burn_rate_per_day: f64,
    /// Window requested by the caller (days)
    pub window_days: u32,
    /// Window actually used: shrinks to the history length when shorter
    pub window_used_days: u32,
    /// Total ledger entries available
    pub history_days: u32,
    pub current_stock: u32,
    /// False when no sales were observed in the window
    pub depleting: bool,
    /// Real-valued days until stock reaches zero; `None` when not depleting
    pub days_until_stockout: Option<f64>,
    pub last_observed_date: NaiveDate,
    pub predicted_out_of_stock_date: NaiveDate,
    pub lead_time_days: u32,
    pub reorder_by_date: NaiveDate,
    /// True when the reorder date is not after the last observed date
    pub urgent_reorder: bool,
}

/// Outcome of the numeric core: facts plus the confidence heuristic
#[derive(Debug, Clone)]
pub struct Forecast {
    pub facts: ForecastFacts,
    pub confidence_level: f64,
}

/// Compute a stock-out forecast from a daily ledger.
///
/// Validates the request, derives the burn rate from the trailing
/// moving-average window, and projects the out-of-stock date. Pure and
/// deterministic: identical input always yields identical output.
pub fn predict_stockout(request: &PredictionRequest) -> Result<Forecast, ForecastError> {
    validate_request(request)?;

    let history = &request.history;
    let window = request.moving_average_window as usize;
    let window_used = window.min(history.len());
    let window_slice = &history[history.len() - window_used..];

    let burn_rate = mean_sales(window_slice);
    let last = history[history.len() - 1];
    let current_stock = last.stock_level;

    let (depleting, days_until_stockout, predicted_date) = if burn_rate <= 0.0 {
        // No measurable depletion trend; push the date out to the horizon
        (false, None, project_date(last.date, NO_DEPLETION_HORIZON_DAYS, "history")?)
    } else {
        let days = current_stock as f64 / burn_rate;
        // Round only the final date, never the intermediate division
        let predicted = project_date(last.date, days.ceil() as i64, "history")?;
        (true, Some(days), predicted)
    };

    let reorder_by_date = project_date(
        predicted_date,
        -(request.lead_time_days as i64),
        "lead_time_days",
    )?;
    let urgent_reorder = depleting && reorder_by_date <= last.date;

    let confidence_level = confidence(
        history.len(),
        request.moving_average_window,
        window_slice,
        burn_rate,
    );

    Ok(Forecast {
        facts: ForecastFacts {
            burn_rate_per_day: burn_rate,
            window_days: request.moving_average_window,
            window_used_days: window_used as u32,
            history_days: history.len() as u32,
            current_stock,
            depleting,
            days_until_stockout,
            last_observed_date: last.date,
            predicted_out_of_stock_date: predicted_date,
            lead_time_days: request.lead_time_days,
            reorder_by_date,
            urgent_reorder,
        },
        confidence_level,
    })
}

fn validate_request(request: &PredictionRequest) -> Result<(), ForecastError> {
    if request.moving_average_window == 0 {
        return Err(ForecastError::InvalidParameter {
            field: "moving_average_window",
            message: "moving average window must be at least 1 day".to_string(),
        });
    }

    if request.history.is_empty() {
        return Err(ForecastError::InsufficientData(
            "history is empty; at least one ledger entry is required".to_string(),
        ));
    }

    for pair in request.history.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(ForecastError::InvalidParameter {
                field: "history",
                message: format!(
                    "ledger dates must be strictly increasing ({} follows {})",
                    pair[1].date, pair[0].date
                ),
            });
        }
    }

    Ok(())
}

/// Shift a date by `days`, failing instead of panicking when the result
/// leaves the representable calendar range.
fn project_date(from: NaiveDate, days: i64, field: &'static str) -> Result<NaiveDate, ForecastError> {
    Duration::try_days(days)
        .and_then(|delta| from.checked_add_signed(delta))
        .ok_or_else(|| ForecastError::InvalidParameter {
            field,
            message: format!(
                "date {} days from {} is outside the representable calendar range",
                days, from
            ),
        })
}

fn mean_sales(window: &[HistoryPoint]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let total: u64 = window.iter().map(|p| p.sales as u64).sum();
    total as f64 / window.len() as f64
}

/// Confidence heuristic in [0, 1].
///
/// `coverage` rises with the share of the requested window the ledger
/// actually covers; `stability` rises as the coefficient of variation of
/// window sales falls. Both directions are monotonic:
///
/// - positive burn rate: `0.5 * coverage + 0.5 * stability`
/// - zero burn rate:     `0.25 * coverage` (strictly below any positive
///   stable trend with the same coverage)
fn confidence(history_len: usize, window: u32, window_slice: &[HistoryPoint], burn_rate: f64) -> f64 {
    let coverage = (history_len as f64 / window as f64).min(1.0);

    if burn_rate <= 0.0 {
        return 0.25 * coverage;
    }

    let n = window_slice.len() as f64;
    let variance = window_slice
        .iter()
        .map(|p| {
            let d = p.sales as f64 - burn_rate;
            d * d
        })
        .sum::<f64>()
        / n;
    let cv = variance.sqrt() / burn_rate;
    let stability = 1.0 / (1.0 + cv);

    (0.5 * coverage + 0.5 * stability).clamp(0.0, 1.0)
}

/// Templated reasoning built from the computed facts.
///
/// The default formatter, and the fallback when an external phrasing service
/// is unavailable.
pub fn format_reasoning(facts: &ForecastFacts) -> String {
    if !facts.depleting {
        return format!(
            "No measurable depletion trend: no sales were recorded over the \
             {}-day window ending {}. At the current stock of {} units the item \
             is not projected to run out under observed conditions.",
            facts.window_used_days, facts.last_observed_date, facts.current_stock
        );
    }

    let mut reasoning = format!(
        "Average sales over the trailing {}-day window were {:.2} units/day. \
         At the current stock of {} units, stock is projected to run out on {}. \
         With a lead time of {} days, a replenishment order should be placed by {}.",
        facts.window_used_days,
        facts.burn_rate_per_day,
        facts.current_stock,
        facts.predicted_out_of_stock_date,
        facts.lead_time_days,
        facts.reorder_by_date,
    );

    if facts.urgent_reorder {
        reasoning.push_str(
            " That reorder date has already passed; an immediate reorder is recommended.",
        );
    }

    if facts.window_used_days < facts.window_days {
        reasoning.push_str(&format!(
            " Note: only {} days of history were available for the requested {}-day window.",
            facts.window_used_days, facts.window_days
        ));
    }

    reasoning
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Declining ledger: `days` consecutive entries, stock falling by
    /// `daily_sales` per day from `starting_stock`
    fn declining_history(
        start: NaiveDate,
        days: u32,
        starting_stock: u32,
        daily_sales: u32,
    ) -> Vec<HistoryPoint> {
        (0..days)
            .map(|i| HistoryPoint {
                date: start + Duration::days(i as i64),
                stock_level: starting_stock - daily_sales * (i + 1),
                sales: daily_sales,
            })
            .collect()
    }

    #[test]
    fn test_constant_sales_days_until_stockout() {
        let history = declining_history(date(2024, 1, 1), 10, 200, 10);
        let request = PredictionRequest {
            history,
            lead_time_days: 0,
            moving_average_window: 5,
        };

        let forecast = predict_stockout(&request).unwrap();
        // Stock after 10 days: 200 - 10*10 = 100; burn rate 10/day
        assert_eq!(forecast.facts.burn_rate_per_day, 10.0);
        assert_eq!(forecast.facts.current_stock, 100);
        assert_eq!(forecast.facts.days_until_stockout, Some(10.0));
        assert_eq!(
            forecast.facts.predicted_out_of_stock_date,
            date(2024, 1, 10) + Duration::days(10)
        );
    }

    #[test]
    fn test_worked_example_urgent_reorder() {
        // 14 days declining by 5/day from 100: current stock 30
        let history = declining_history(date(2024, 3, 1), 14, 100, 5);
        let request = PredictionRequest {
            history,
            lead_time_days: 7,
            moving_average_window: 7,
        };

        let forecast = predict_stockout(&request).unwrap();
        assert_eq!(forecast.facts.burn_rate_per_day, 5.0);
        assert_eq!(forecast.facts.current_stock, 30);
        assert_eq!(forecast.facts.days_until_stockout, Some(6.0));

        let last = date(2024, 3, 14);
        assert_eq!(forecast.facts.predicted_out_of_stock_date, last + Duration::days(6));
        assert_eq!(
            forecast.facts.reorder_by_date,
            last + Duration::days(6) - Duration::days(7)
        );
        // Reorder date is in the past relative to the last observation
        assert!(forecast.facts.urgent_reorder);
        assert!(format_reasoning(&forecast.facts).contains("immediate reorder"));
    }

    #[test]
    fn test_reorder_point_arithmetic() {
        for lead_time in [0u32, 7, 30] {
            let history = declining_history(date(2024, 5, 1), 10, 500, 4);
            let request = PredictionRequest {
                history,
                lead_time_days: lead_time,
                moving_average_window: 10,
            };

            let forecast = predict_stockout(&request).unwrap();
            assert_eq!(
                forecast.facts.reorder_by_date,
                forecast.facts.predicted_out_of_stock_date
                    - Duration::days(lead_time as i64)
            );
        }
    }

    #[test]
    fn test_empty_history_is_insufficient_data() {
        let request = PredictionRequest {
            history: vec![],
            lead_time_days: 7,
            moving_average_window: 14,
        };

        assert!(matches!(
            predict_stockout(&request),
            Err(ForecastError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_zero_window_is_invalid_parameter() {
        let history = declining_history(date(2024, 1, 1), 5, 50, 2);
        let request = PredictionRequest {
            history,
            lead_time_days: 7,
            moving_average_window: 0,
        };

        assert!(matches!(
            predict_stockout(&request),
            Err(ForecastError::InvalidParameter {
                field: "moving_average_window",
                ..
            })
        ));
    }

    #[test]
    fn test_unordered_history_is_invalid_parameter() {
        let history = vec![
            HistoryPoint { date: date(2024, 1, 2), stock_level: 50, sales: 2 },
            HistoryPoint { date: date(2024, 1, 2), stock_level: 48, sales: 2 },
        ];
        let request = PredictionRequest::new(history);

        assert!(matches!(
            predict_stockout(&request),
            Err(ForecastError::InvalidParameter { field: "history", .. })
        ));
    }

    #[test]
    fn test_window_larger_than_history_uses_full_history() {
        let history = declining_history(date(2024, 1, 1), 3, 100, 5);
        let request = PredictionRequest {
            history,
            lead_time_days: 7,
            moving_average_window: 30,
        };

        let forecast = predict_stockout(&request).unwrap();
        assert_eq!(forecast.facts.window_used_days, 3);
        assert_eq!(forecast.facts.burn_rate_per_day, 5.0);
        // Partial coverage caps confidence below a full window
        assert!(forecast.confidence_level < 1.0);
    }

    #[test]
    fn test_zero_sales_means_no_depletion() {
        let history: Vec<HistoryPoint> = (0..14)
            .map(|i| HistoryPoint {
                date: date(2024, 1, 1) + Duration::days(i),
                stock_level: 40,
                sales: 0,
            })
            .collect();
        let request = PredictionRequest::new(history);

        let forecast = predict_stockout(&request).unwrap();
        assert!(!forecast.facts.depleting);
        assert_eq!(forecast.facts.days_until_stockout, None);
        assert_eq!(
            forecast.facts.predicted_out_of_stock_date,
            date(2024, 1, 14) + Duration::days(NO_DEPLETION_HORIZON_DAYS)
        );
        assert!(format_reasoning(&forecast.facts).contains("No measurable depletion trend"));
    }

    #[test]
    fn test_zero_sales_confidence_strictly_lower_than_stable_trend() {
        let start = date(2024, 1, 1);
        let flat: Vec<HistoryPoint> = (0..14)
            .map(|i| HistoryPoint {
                date: start + Duration::days(i),
                stock_level: 100,
                sales: 0,
            })
            .collect();
        let stable = declining_history(start, 14, 100, 3);

        let flat_forecast = predict_stockout(&PredictionRequest::new(flat)).unwrap();
        let stable_forecast = predict_stockout(&PredictionRequest::new(stable)).unwrap();

        assert!(flat_forecast.confidence_level < stable_forecast.confidence_level);
    }

    #[test]
    fn test_confidence_rises_with_history_coverage() {
        let start = date(2024, 1, 1);
        let short = declining_history(start, 5, 200, 4);
        let long = declining_history(start, 14, 200, 4);

        let short_conf = predict_stockout(&PredictionRequest::new(short))
            .unwrap()
            .confidence_level;
        let long_conf = predict_stockout(&PredictionRequest::new(long))
            .unwrap()
            .confidence_level;

        assert!(short_conf < long_conf);
    }

    #[test]
    fn test_confidence_falls_with_sales_variance() {
        let start = date(2024, 1, 1);
        let stable = declining_history(start, 14, 400, 10);
        let noisy: Vec<HistoryPoint> = (0..14)
            .map(|i| HistoryPoint {
                date: start + Duration::days(i),
                stock_level: 400 - 10 * (i as u32 + 1),
                // Alternates 2 and 18, same mean of 10
                sales: if i % 2 == 0 { 2 } else { 18 },
            })
            .collect();

        let stable_conf = predict_stockout(&PredictionRequest::new(stable))
            .unwrap()
            .confidence_level;
        let noisy_conf = predict_stockout(&PredictionRequest::new(noisy))
            .unwrap()
            .confidence_level;

        assert!(noisy_conf < stable_conf);
    }

    #[test]
    fn test_fractional_burn_rate_rounds_only_the_date() {
        // 3 units sold over 2 days: burn rate 1.5/day, 10 units in stock
        let history = vec![
            HistoryPoint { date: date(2024, 6, 1), stock_level: 12, sales: 1 },
            HistoryPoint { date: date(2024, 6, 2), stock_level: 10, sales: 2 },
        ];
        let request = PredictionRequest {
            history,
            lead_time_days: 0,
            moving_average_window: 2,
        };

        let forecast = predict_stockout(&request).unwrap();
        // 10 / 1.5 = 6.67 days, rounded up to 7 calendar days
        assert_eq!(forecast.facts.burn_rate_per_day, 1.5);
        assert_eq!(
            forecast.facts.predicted_out_of_stock_date,
            date(2024, 6, 2) + Duration::days(7)
        );
    }

    #[test]
    fn test_extreme_stock_yields_error_not_panic() {
        // 2e9 units at 1/day projects millions of years out, past the
        // calendar range NaiveDate can represent
        let history = vec![HistoryPoint {
            date: date(2024, 1, 1),
            stock_level: 2_000_000_000,
            sales: 1,
        }];
        let request = PredictionRequest {
            history,
            lead_time_days: 7,
            moving_average_window: 14,
        };

        assert!(matches!(
            predict_stockout(&request),
            Err(ForecastError::InvalidParameter { field: "history", .. })
        ));
    }

    #[test]
    fn test_extreme_lead_time_yields_error_not_panic() {
        let history = declining_history(date(2024, 1, 1), 10, 200, 10);
        let request = PredictionRequest {
            history,
            lead_time_days: 4_000_000_000,
            moving_average_window: 10,
        };

        assert!(matches!(
            predict_stockout(&request),
            Err(ForecastError::InvalidParameter {
                field: "lead_time_days",
                ..
            })
        ));
    }

    #[test]
    fn test_determinism() {
        let history = declining_history(date(2024, 1, 1), 14, 300, 7);
        let request = PredictionRequest::new(history);

        let a = predict_stockout(&request).unwrap();
        let b = predict_stockout(&request).unwrap();

        assert_eq!(a.confidence_level, b.confidence_level);
        assert_eq!(
            a.facts.predicted_out_of_stock_date,
            b.facts.predicted_out_of_stock_date
        );
        assert_eq!(format_reasoning(&a.facts), format_reasoning(&b.facts));
    }
}
