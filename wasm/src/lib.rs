//! WebAssembly module for the Stockpile dashboard
//!
//! Provides client-side computation for:
//! - Stock-out forecasting (same core the backend uses)
//! - Item status derivation
//! - Offline input validation

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Run the stock-out forecast over a JSON `PredictionRequest`.
///
/// Returns a JSON object with the predicted date, reorder date, confidence,
/// templated reasoning, and the underlying numeric facts.
#[wasm_bindgen]
pub fn predict_stockout(request_json: &str) -> Result<String, JsValue> {
    let request: PredictionRequest = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid request JSON: {}", e)))?;

    let forecast = shared::forecast::predict_stockout(&request)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let result = PredictionResult {
        predicted_out_of_stock_date: forecast.facts.predicted_out_of_stock_date,
        reorder_by_date: forecast.facts.reorder_by_date,
        confidence_level: forecast.confidence_level,
        reasoning: shared::forecast::format_reasoning(&forecast.facts),
        facts: forecast.facts,
    };

    serde_json::to_string(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Derive an item's stock status from its stock level
#[wasm_bindgen]
pub fn derive_item_status(stock: i32, low_stock_threshold: i32) -> String {
    derive_status(stock, low_stock_threshold).to_string()
}

/// Validate a SKU, returning an error message or empty string
#[wasm_bindgen]
pub fn check_sku(sku: &str) -> String {
    match validate_sku(sku) {
        Ok(()) => String::new(),
        Err(msg) => msg.to_string(),
    }
}

/// Validate an email address, returning an error message or empty string
#[wasm_bindgen]
pub fn check_email(email: &str) -> String {
    match validate_email(email) {
        Ok(()) => String::new(),
        Err(msg) => msg.to_string(),
    }
}

/// Validate a phone number, returning an error message or empty string
#[wasm_bindgen]
pub fn check_phone(phone: &str) -> String {
    match validate_phone(phone) {
        Ok(()) => String::new(),
        Err(msg) => msg.to_string(),
    }
}
