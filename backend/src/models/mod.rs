//! Database models for the Stockpile backend
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::models::*;
