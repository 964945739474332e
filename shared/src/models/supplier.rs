//! Supplier models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A supplier of inventory items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Number of distinct items sourced from this supplier
    pub items_supplied: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
