//! Business logic services for the Stockpile backend

pub mod dashboard;
pub mod item;
pub mod prediction;
pub mod stock_history;
pub mod supplier;

pub use dashboard::DashboardService;
pub use item::ItemService;
pub use prediction::PredictionService;
pub use stock_history::StockHistoryService;
pub use supplier::SupplierService;
