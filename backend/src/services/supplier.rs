//! Supplier management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Supplier;
use shared::{validate_email, validate_phone, PaginatedResponse, Pagination, PaginationMeta};

/// Supplier service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Database row for a supplier, with the supplied-item count aggregated in
#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    contact_person: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    items_supplied: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            contact_person: row.contact_person,
            email: row.email,
            phone: row.phone,
            items_supplied: row.items_supplied as i32,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a supplier
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Input for updating a supplier
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

const SUPPLIER_SELECT: &str = r#"
    SELECT s.id, s.name, s.contact_person, s.email, s.phone,
           COUNT(i.id) AS items_supplied, s.created_at, s.updated_at
    FROM suppliers s
    LEFT JOIN items i ON i.supplier_id = s.id
"#;

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List one page of suppliers
    pub async fn list_suppliers(
        &self,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<Supplier>> {
        let total_items = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "{} GROUP BY s.id ORDER BY s.name ASC LIMIT $1 OFFSET $2",
            SUPPLIER_SELECT
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(Supplier::from).collect(),
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Get a supplier by ID
    pub async fn get_supplier(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "{} WHERE s.id = $1 GROUP BY s.id",
            SUPPLIER_SELECT
        ))
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(row.into())
    }

    /// Create a supplier
    pub async fn create_supplier(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        validate_supplier_contact(input.email.as_deref(), input.phone.as_deref())?;

        // Supplier names must be unique (case-insensitive)
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM suppliers WHERE LOWER(name) = LOWER($1)",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        let supplier_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO suppliers (name, contact_person, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact_person)
        .bind(&input.email)
        .bind(&input.phone)
        .fetch_one(&self.db)
        .await?;

        self.get_supplier(supplier_id).await
    }

    /// Update a supplier
    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        input: UpdateSupplierInput,
    ) -> AppResult<Supplier> {
        validate_supplier_contact(input.email.as_deref(), input.phone.as_deref())?;

        let existing = self.get_supplier(supplier_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let contact_person = input.contact_person.or(existing.contact_person);
        let email = input.email.or(existing.email);
        let phone = input.phone.or(existing.phone);

        sqlx::query(
            r#"
            UPDATE suppliers
            SET name = $1, contact_person = $2, email = $3, phone = $4, updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(&name)
        .bind(&contact_person)
        .bind(&email)
        .bind(&phone)
        .bind(supplier_id)
        .execute(&self.db)
        .await?;

        self.get_supplier(supplier_id).await
    }

    /// Delete a supplier; items sourced from it keep a null supplier
    pub async fn delete_supplier(&self, supplier_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(supplier_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        Ok(())
    }
}

fn validate_supplier_contact(email: Option<&str>, phone: Option<&str>) -> AppResult<()> {
    if let Some(email) = email {
        validate_email(email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
            message_es: "Formato de correo electrónico no válido".to_string(),
        })?;
    }
    if let Some(phone) = phone {
        validate_phone(phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
            message_es: "Número de teléfono no válido".to_string(),
        })?;
    }
    Ok(())
}
