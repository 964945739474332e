//! Inventory item models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inventory item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    /// Stock keeping unit, unique per item
    pub sku: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub cost: Option<Decimal>,
    pub stock: i32,
    pub status: ItemStatus,
    pub category: String,
    pub supplier_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock status of an item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    InStock,
    LowStock,
    OutOfStock,
    Discontinued,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::InStock => "in_stock",
            ItemStatus::LowStock => "low_stock",
            ItemStatus::OutOfStock => "out_of_stock",
            ItemStatus::Discontinued => "discontinued",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive an item's status from its stock level.
///
/// Discontinued items keep their status regardless of stock; callers check
/// that before deriving.
pub fn derive_status(stock: i32, low_stock_threshold: i32) -> ItemStatus {
    if stock <= 0 {
        ItemStatus::OutOfStock
    } else if stock <= low_stock_threshold {
        ItemStatus::LowStock
    } else {
        ItemStatus::InStock
    }
}
