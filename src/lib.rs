pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod models;
pub mod service;

pub use crate::config::AppConfig;
pub use error::LedgerError;
pub use service::LedgerService;
