//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod format;
pub mod log;
pub mod selection;
pub mod session;

// Re-export main types for cleaner imports
pub use conversion::{ConversionRate, to_amount, to_sats};
pub use currency::{CurrencyCode, RateProvider};
pub use selection::SelectionStore;
pub use session::{AmountPair, Field, Session};
