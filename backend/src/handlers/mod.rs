//! HTTP handlers for the Stockpile backend

mod dashboard;
mod health;
mod item;
mod stock;
mod supplier;

pub use dashboard::*;
pub use health::*;
pub use item::*;
pub use stock::*;
pub use supplier::*;
