//! Dashboard summary service

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;

/// Dashboard service aggregating inventory headline numbers
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

/// Headline numbers for the dashboard page
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_items: i64,
    pub total_suppliers: i64,
    pub total_stock_units: i64,
    /// Sum of price * stock over non-discontinued items
    pub total_stock_value: Decimal,
    pub low_stock_items: Vec<StockAttentionItem>,
    pub out_of_stock_items: Vec<StockAttentionItem>,
}

/// An item needing attention on the dashboard
#[derive(Debug, Serialize, FromRow)]
pub struct StockAttentionItem {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub stock: i32,
    pub category: String,
}

#[derive(Debug, FromRow)]
struct TotalsRow {
    total_items: i64,
    total_stock_units: Option<i64>,
    total_stock_value: Option<Decimal>,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Aggregate the dashboard summary
    pub async fn get_summary(&self) -> AppResult<DashboardSummary> {
        let totals = sqlx::query_as::<_, TotalsRow>(
            r#"
            SELECT COUNT(*) AS total_items,
                   SUM(stock)::bigint AS total_stock_units,
                   SUM(price * stock) AS total_stock_value
            FROM items
            WHERE status != 'discontinued'
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let total_suppliers = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.db)
            .await?;

        let low_stock_items = self.items_with_status("low_stock").await?;
        let out_of_stock_items = self.items_with_status("out_of_stock").await?;

        Ok(DashboardSummary {
            total_items: totals.total_items,
            total_suppliers,
            total_stock_units: totals.total_stock_units.unwrap_or(0),
            total_stock_value: totals.total_stock_value.unwrap_or(Decimal::ZERO),
            low_stock_items,
            out_of_stock_items,
        })
    }

    async fn items_with_status(&self, status: &str) -> AppResult<Vec<StockAttentionItem>> {
        let items = sqlx::query_as::<_, StockAttentionItem>(
            r#"
            SELECT id, name, sku, stock, category
            FROM items
            WHERE status = $1
            ORDER BY stock ASC, name ASC
            "#,
        )
        .bind(status)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }
}
