//! Shared types and models for the Stockpile inventory platform
//!
//! This crate contains types shared between the backend, frontend (via WASM),
//! and other components of the system, plus the pure stock-out forecast core.

pub mod forecast;
pub mod models;
pub mod types;
pub mod validation;

pub use forecast::*;
pub use models::*;
pub use types::*;
pub use validation::*;
