//! External API integrations

pub mod ai_phrasing;

pub use ai_phrasing::AiPhrasingClient;
