pub mod fx_errors;
pub mod fx_model;
pub mod fx_repository;
pub mod fx_service;
pub mod fx_traits;

pub use fx_errors::FxError;
pub use fx_model::{ConversionResult, ExchangeRate, Money, ReusePolicy};
pub use fx_repository::{InMemoryRateStore, SqliteRateStore};
pub use fx_service::FxService;
