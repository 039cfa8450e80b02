//! Scrape endpoint of the exporter.

#[macro_use]
extern crate tracing;

pub mod error;
pub mod metrics;
pub mod router;

use eyre::{
    Result,
    WrapErr as _,
};
use rds_exporter_collector::Orchestrator;
use rds_exporter_config::ServerConfig;
use router::create_router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Bind the listener and serve `/healthz` and the metrics path until ctrl-c.
pub async fn serve(server: &ServerConfig, orchestrator: Arc<Orchestrator>) -> Result<()> {
    let app = create_router(orchestrator, &server.metrics_path);

    let address = server.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .wrap_err_with(|| format!("Failed to bind {address}"))?;

    info!("listening on {address}, metrics at {}", server.metrics_path);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
