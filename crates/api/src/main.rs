use anyhow::Context;

use vidcat_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vidcat_observability::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    let services = vidcat_api::app::services::build_services(&config)
        .await
        .context("failed to initialize catalog store")?;
    tracing::info!(store = services.store().kind(), "catalog store ready");

    let app = vidcat_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
