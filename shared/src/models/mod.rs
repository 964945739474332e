//! Domain models for the Stockpile inventory platform

mod item;
mod stock;
mod supplier;

pub use item::*;
pub use stock::*;
pub use supplier::*;
