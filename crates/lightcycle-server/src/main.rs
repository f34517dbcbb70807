//! Lightcycle server binary.
//!
//! Configuration comes from the environment:
//! - `LIGHTCYCLE_BIND`: listen address (default `0.0.0.0:6008`)
//! - `LIGHTCYCLE_IDLE_TIMEOUT_SECS`: drop silent clients after this long
//! - `RUST_LOG`: log filter (default `info`)

use lightcycle::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), LightcycleError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(bind = %config.bind_addr, idle_timeout = ?config.idle_timeout, "starting");

    let server = LightcycleServer::builder()
        .server_config(config)
        .build()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to start"))?;

    server.run().await
}
