//! Database adapters: connection pool and embedded migrations.
//!
//! Schema creation is an explicit startup step, separate from request
//! handling. Migrations are idempotent (SQLx records applied versions in
//! `_sqlx_migrations`).
//!
//! ```rust,ignore
//! #[sqlx::test(migrator = "vidcat_infra::db::MIGRATOR")]
//! async fn test_something(pool: PgPool) { /* ... */ }
//! ```

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// All catalog migrations from `crates/infra/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub type MigrationResult<T> = Result<T, sqlx::migrate::MigrateError>;

/// Build the connection pool. Connections are checked out per request by the store.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> MigrationResult<()> {
    info!("Running catalog migrations...");
    MIGRATOR.run(pool).await?;
    info!("Catalog migrations complete");
    Ok(())
}
