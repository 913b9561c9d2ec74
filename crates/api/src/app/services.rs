use std::sync::Arc;

use thiserror::Error;

use vidcat_infra::{
    AppConfig, CatalogSession, CatalogStore, InMemoryCatalogStore, PostgresCatalogStore, StoreError,
    db,
};

/// Failure while wiring the store at startup.
#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("failed to connect to Postgres: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to run migrations: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Shared application services, installed on the router as an extension.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn CatalogStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCatalogStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Check out a request-scoped session.
    pub async fn session(&self) -> Result<Box<dyn CatalogSession>, StoreError> {
        self.store.session().await
    }
}

/// Select and prepare the store from configuration.
///
/// With `DATABASE_URL` set this connects the pool and (unless disabled) runs
/// migrations before any request is served. Without it, falls back to the
/// in-memory store.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, ServicesError> {
    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set; using in-memory catalog store");
        return Ok(AppServices::in_memory());
    };

    let pool = db::connect(db_config).await.map_err(ServicesError::Connect)?;

    if config.run_migrations {
        db::run_migrations(&pool).await.map_err(ServicesError::Migrate)?;
    } else {
        tracing::info!("VIDCAT_RUN_MIGRATIONS=false; skipping migrations");
    }

    Ok(AppServices::new(Arc::new(PostgresCatalogStore::new(pool))))
}
