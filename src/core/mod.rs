//! Core business logic: domain types and the state machine driving them

pub mod config;
pub mod conversion;
pub mod currency;
pub mod dispatch;
pub mod history;
pub mod log;
pub mod pagination;
pub mod state;
pub mod storage;

// Re-export main types for cleaner imports
pub use currency::{CurrencyCatalog, RateSnapshot};
pub use dispatch::{Effect, Msg, Render, update};
pub use history::{ConversionRecord, History, SortOrder};
pub use state::{AppState, Tab};
pub use storage::KeyValueStorage;
