//! Stock ledger service
//!
//! One row per item per day: closing stock level and units sold. The ledger
//! is what the stock-out predictor consumes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::HistoryPoint;

/// Stock history service for the per-item daily ledger
#[derive(Clone)]
pub struct StockHistoryService {
    db: PgPool,
}

/// One ledger row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockHistoryEntry {
    pub id: Uuid,
    pub item_id: Uuid,
    pub entry_date: NaiveDate,
    pub stock_level: i32,
    pub sales: i32,
    pub created_at: DateTime<Utc>,
}

/// Input for recording one daily observation
#[derive(Debug, Deserialize)]
pub struct RecordHistoryInput {
    /// Defaults to today when omitted
    pub entry_date: Option<NaiveDate>,
    pub stock_level: i32,
    pub sales: i32,
}

impl StockHistoryService {
    /// Create a new StockHistoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get the full ledger for an item, ascending by date
    pub async fn get_history(&self, item_id: Uuid) -> AppResult<Vec<StockHistoryEntry>> {
        self.ensure_item_exists(item_id).await?;

        let entries = sqlx::query_as::<_, StockHistoryEntry>(
            r#"
            SELECT id, item_id, entry_date, stock_level, sales, created_at
            FROM stock_history
            WHERE item_id = $1
            ORDER BY entry_date ASC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Record one daily observation; a second write for the same day
    /// replaces the first
    pub async fn record_entry(
        &self,
        item_id: Uuid,
        input: RecordHistoryInput,
    ) -> AppResult<StockHistoryEntry> {
        if input.stock_level < 0 {
            return Err(AppError::Validation {
                field: "stock_level".to_string(),
                message: "Stock level cannot be negative".to_string(),
                message_es: "El nivel de stock no puede ser negativo".to_string(),
            });
        }
        if input.sales < 0 {
            return Err(AppError::Validation {
                field: "sales".to_string(),
                message: "Sales cannot be negative".to_string(),
                message_es: "Las ventas no pueden ser negativas".to_string(),
            });
        }

        self.ensure_item_exists(item_id).await?;

        let entry_date = input.entry_date.unwrap_or_else(|| Utc::now().date_naive());

        let entry = sqlx::query_as::<_, StockHistoryEntry>(
            r#"
            INSERT INTO stock_history (item_id, entry_date, stock_level, sales)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (item_id, entry_date)
            DO UPDATE SET stock_level = EXCLUDED.stock_level, sales = EXCLUDED.sales
            RETURNING id, item_id, entry_date, stock_level, sales, created_at
            "#,
        )
        .bind(item_id)
        .bind(entry_date)
        .bind(input.stock_level)
        .bind(input.sales)
        .fetch_one(&self.db)
        .await?;

        Ok(entry)
    }

    /// Load the ledger as forecast input points
    pub async fn history_points(&self, item_id: Uuid) -> AppResult<Vec<HistoryPoint>> {
        let entries = self.get_history(item_id).await?;

        Ok(entries
            .into_iter()
            .map(|e| HistoryPoint {
                date: e.entry_date,
                // Negative values are rejected at write time
                stock_level: e.stock_level.max(0) as u32,
                sales: e.sales.max(0) as u32,
            })
            .collect())
    }

    async fn ensure_item_exists(&self, item_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
                .bind(item_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Item".to_string()));
        }

        Ok(())
    }
}
