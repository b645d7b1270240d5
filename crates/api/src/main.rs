use std::sync::Arc;

use anyhow::Context;

use nexus_api::app::{build_app, build_services};
use nexus_infra::CatalogConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables win.
    let _ = dotenvy::dotenv();

    let config = CatalogConfig::from_env().context("invalid configuration")?;
    nexus_observability::init(config.log_format);

    let services = build_services(&config)
        .await
        .with_context(|| format!("failed to open catalog database {}", config.database_url))?;
    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
