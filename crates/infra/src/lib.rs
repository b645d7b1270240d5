//! Infrastructure layer: catalog persistence and configuration.

pub mod catalog_store;
pub mod config;

pub use catalog_store::{CatalogStore, SqliteCatalogStore, StoreError, UpdateOutcome};
pub use config::{CatalogConfig, ConfigError};
