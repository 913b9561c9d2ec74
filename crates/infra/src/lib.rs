//! Infrastructure layer: storage, migrations, configuration.

pub mod config;
pub mod db;
pub mod store;

pub use config::{AppConfig, ConfigError, DatabaseConfig};
pub use store::{CatalogSession, CatalogStore, InMemoryCatalogStore, PostgresCatalogStore, StoreError};
