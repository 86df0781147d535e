//! parkd binary: configure logging, build the service, run the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use parkd::ParkingService;
use parkd::transport::{ServerConfig, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut config = ServerConfig::default();
    if let Ok(host) = std::env::var("PARKD_HOST") {
        config.host = host;
    }
    if let Ok(port) = std::env::var("PARKD_PORT") {
        config.port = port.parse().context("PARKD_PORT must be a valid port")?;
    }

    let service = Arc::new(ParkingService::new());

    // Optionally seed the lot at startup; otherwise it waits for
    // POST /api/parking_lot.
    if let Ok(raw) = std::env::var("PARKD_INITIAL_SLOTS") {
        let capacity = raw
            .parse()
            .context("PARKD_INITIAL_SLOTS must be a positive integer")?;
        service.init(capacity).await?;
    }

    serve(config, service).await
}
