//! Delivery-Alert Watcher — entry point.
//!
//! Wires the two halves of the service together: a background task that
//! polls Soroban `getEvents` for the alert events published by the
//! shipping/shopping order-status contracts, and a small Axum REST API
//! over the stored alerts.

mod api;
mod config;
mod db;
mod errors;
mod events;
mod rpc;
mod watcher;

use std::sync::Arc;

use reqwest::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use watcher::WatcherState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing), then the config.
    let _ = dotenvy::dotenv();
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    let addr = format!("0.0.0.0:{}", config.api_port);

    // SQLite pool; creates the database file on first run.
    let pool = db::init_pool(&config.database_url).await?;

    // Shared outbound HTTP client for the RPC poll loop.
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    tokio::spawn(watcher::run(Arc::new(WatcherState {
        pool: pool.clone(),
        config,
        client,
    })));

    let app = api::router(Arc::new(api::ApiState { pool }));
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
