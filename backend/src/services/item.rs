//! Inventory item service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{derive_status, Item, ItemStatus};
use shared::{validate_price, validate_sku, PaginatedResponse, Pagination, PaginationMeta};

/// Item service for managing the inventory catalog
#[derive(Clone)]
pub struct ItemService {
    db: PgPool,
    low_stock_threshold: i32,
}

/// Database row for an item, joined with the supplier name
#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    sku: String,
    description: Option<String>,
    price: Decimal,
    cost: Option<Decimal>,
    stock: i32,
    status: String,
    category: String,
    supplier_id: Option<Uuid>,
    supplier_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for ItemWithSupplier {
    fn from(row: ItemRow) -> Self {
        ItemWithSupplier {
            item: Item {
                id: row.id,
                name: row.name,
                sku: row.sku,
                description: row.description,
                price: row.price,
                cost: row.cost,
                stock: row.stock,
                status: status_from_str(&row.status),
                category: row.category,
                supplier_id: row.supplier_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            supplier_name: row.supplier_name,
        }
    }
}

/// Item with its supplier's name, as the inventory table renders it
#[derive(Debug, Clone, Serialize)]
pub struct ItemWithSupplier {
    #[serde(flatten)]
    pub item: Item,
    pub supplier_name: Option<String>,
}

/// Input for creating an item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub cost: Option<Decimal>,
    pub stock: i32,
    pub category: String,
    pub supplier_id: Option<Uuid>,
}

/// Input for updating an item
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub category: Option<String>,
    pub supplier_id: Option<Uuid>,
    /// `discontinued` pins the status; any other explicit status clears the
    /// pin and re-derives from the current stock level
    pub status: Option<ItemStatus>,
}

/// Input for adjusting an item's stock level
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    pub stock: i32,
}

/// Filters for listing items
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Flat row for CSV export
#[derive(Debug, Serialize)]
struct ItemExportRow {
    name: String,
    sku: String,
    category: String,
    stock: i32,
    status: String,
    price: Decimal,
    supplier: String,
}

const ITEM_SELECT: &str = r#"
    SELECT i.id, i.name, i.sku, i.description, i.price, i.cost, i.stock,
           i.status, i.category, i.supplier_id, s.name AS supplier_name,
           i.created_at, i.updated_at
    FROM items i
    LEFT JOIN suppliers s ON s.id = i.supplier_id
"#;

impl ItemService {
    /// Create a new ItemService instance
    pub fn new(db: PgPool, low_stock_threshold: i32) -> Self {
        Self {
            db,
            low_stock_threshold,
        }
    }

    /// List one page of items, optionally filtered by status and category
    pub async fn list_items(
        &self,
        filter: ItemFilter,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<ItemWithSupplier>> {
        let total_items = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM items i
            WHERE ($1::text IS NULL OR i.status = $1)
              AND ($2::text IS NULL OR i.category = $2)
            "#,
        )
        .bind(&filter.status)
        .bind(&filter.category)
        .fetch_one(&self.db)
        .await?;

        let data = self.fetch_items(&filter, Some(&pagination)).await?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Fetch items matching the filter; a NULL limit means the whole catalog
    async fn fetch_items(
        &self,
        filter: &ItemFilter,
        pagination: Option<&Pagination>,
    ) -> AppResult<Vec<ItemWithSupplier>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            r#"{}
            WHERE ($1::text IS NULL OR i.status = $1)
              AND ($2::text IS NULL OR i.category = $2)
            ORDER BY i.name ASC
            LIMIT $3 OFFSET $4
            "#,
            ITEM_SELECT
        ))
        .bind(&filter.status)
        .bind(&filter.category)
        .bind(pagination.map(Pagination::limit))
        .bind(pagination.map(Pagination::offset).unwrap_or(0))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(ItemWithSupplier::from).collect())
    }

    /// Get an item by ID
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<ItemWithSupplier> {
        let row = sqlx::query_as::<_, ItemRow>(&format!("{} WHERE i.id = $1", ITEM_SELECT))
            .bind(item_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        Ok(row.into())
    }

    /// Create an item; status is derived from the initial stock level
    pub async fn create_item(&self, input: CreateItemInput) -> AppResult<ItemWithSupplier> {
        validate_item_fields(&input.sku, input.price, input.cost, input.stock)?;

        let sku_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM items WHERE LOWER(sku) = LOWER($1))",
        )
        .bind(&input.sku)
        .fetch_one(&self.db)
        .await?;

        if sku_taken {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }

        if let Some(supplier_id) = input.supplier_id {
            self.ensure_supplier_exists(supplier_id).await?;
        }

        let status = derive_status(input.stock, self.low_stock_threshold);

        let item_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO items (name, sku, description, price, cost, stock, status, category, supplier_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.sku)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.cost)
        .bind(input.stock)
        .bind(status.as_str())
        .bind(&input.category)
        .bind(input.supplier_id)
        .fetch_one(&self.db)
        .await?;

        self.get_item(item_id).await
    }

    /// Update an item
    pub async fn update_item(
        &self,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<ItemWithSupplier> {
        let existing = self.get_item(item_id).await?.item;

        if let Some(price) = input.price {
            validate_price(price).map_err(price_validation_error("price"))?;
        }
        if let Some(cost) = input.cost {
            validate_price(cost).map_err(price_validation_error("cost"))?;
        }
        if let Some(supplier_id) = input.supplier_id {
            self.ensure_supplier_exists(supplier_id).await?;
        }

        let name = input.name.unwrap_or(existing.name);
        let description = input.description.or(existing.description);
        let price = input.price.unwrap_or(existing.price);
        let cost = input.cost.or(existing.cost);
        let category = input.category.unwrap_or(existing.category);
        let supplier_id = input.supplier_id.or(existing.supplier_id);
        let status = resolve_status(
            input.status,
            existing.status,
            existing.stock,
            self.low_stock_threshold,
        );

        sqlx::query(
            r#"
            UPDATE items
            SET name = $1, description = $2, price = $3, cost = $4, category = $5,
                supplier_id = $6, status = $7, updated_at = NOW()
            WHERE id = $8
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(price)
        .bind(cost)
        .bind(&category)
        .bind(supplier_id)
        .bind(status.as_str())
        .bind(item_id)
        .execute(&self.db)
        .await?;

        self.get_item(item_id).await
    }

    /// Set an item's stock level and re-derive its status
    pub async fn adjust_stock(
        &self,
        item_id: Uuid,
        input: AdjustStockInput,
    ) -> AppResult<ItemWithSupplier> {
        if input.stock < 0 {
            return Err(AppError::Validation {
                field: "stock".to_string(),
                message: "Stock cannot be negative".to_string(),
                message_es: "El stock no puede ser negativo".to_string(),
            });
        }

        let existing = self.get_item(item_id).await?.item;
        let status = if existing.status == ItemStatus::Discontinued {
            ItemStatus::Discontinued
        } else {
            derive_status(input.stock, self.low_stock_threshold)
        };

        sqlx::query(
            "UPDATE items SET stock = $1, status = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(input.stock)
        .bind(status.as_str())
        .bind(item_id)
        .execute(&self.db)
        .await?;

        self.get_item(item_id).await
    }

    /// Delete an item and its ledger
    pub async fn delete_item(&self, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Item".to_string()));
        }

        Ok(())
    }

    /// Export the item catalog as CSV, unpaginated
    pub async fn export_csv(&self, filter: ItemFilter) -> AppResult<String> {
        let items = self.fetch_items(&filter, None).await?;

        let mut wtr = csv::Writer::from_writer(vec![]);
        for entry in items {
            wtr.serialize(ItemExportRow {
                name: entry.item.name,
                sku: entry.item.sku,
                category: entry.item.category,
                stock: entry.item.stock,
                status: entry.item.status.to_string(),
                price: entry.item.price,
                supplier: entry.supplier_name.unwrap_or_default(),
            })
            .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;
        }

        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))?;

        Ok(csv_data)
    }

    async fn ensure_supplier_exists(&self, supplier_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)")
                .bind(supplier_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        Ok(())
    }
}

fn validate_item_fields(
    sku: &str,
    price: Decimal,
    cost: Option<Decimal>,
    stock: i32,
) -> AppResult<()> {
    validate_sku(sku).map_err(|msg| AppError::Validation {
        field: "sku".to_string(),
        message: msg.to_string(),
        message_es: "SKU no válido".to_string(),
    })?;
    validate_price(price).map_err(price_validation_error("price"))?;
    if let Some(cost) = cost {
        validate_price(cost).map_err(price_validation_error("cost"))?;
    }
    if stock < 0 {
        return Err(AppError::Validation {
            field: "stock".to_string(),
            message: "Stock cannot be negative".to_string(),
            message_es: "El stock no puede ser negativo".to_string(),
        });
    }
    Ok(())
}

fn price_validation_error(field: &'static str) -> impl Fn(&'static str) -> AppError {
    move |msg| AppError::Validation {
        field: field.to_string(),
        message: msg.to_string(),
        message_es: "El precio no puede ser negativo".to_string(),
    }
}

/// Status resolution for updates. An explicit `discontinued` pins the
/// status; any other explicit status clears the pin and re-derives from
/// stock; absence keeps an existing pin.
fn resolve_status(
    requested: Option<ItemStatus>,
    current: ItemStatus,
    stock: i32,
    low_stock_threshold: i32,
) -> ItemStatus {
    match requested {
        Some(ItemStatus::Discontinued) => ItemStatus::Discontinued,
        Some(_) => derive_status(stock, low_stock_threshold),
        None if current == ItemStatus::Discontinued => ItemStatus::Discontinued,
        None => derive_status(stock, low_stock_threshold),
    }
}

/// Parse an item status stored as text
fn status_from_str(status: &str) -> ItemStatus {
    match status {
        "in_stock" => ItemStatus::InStock,
        "low_stock" => ItemStatus::LowStock,
        "discontinued" => ItemStatus::Discontinued,
        _ => ItemStatus::OutOfStock,
    }
}
