//! `textseal-server` — HTTP entry point for the sealer core.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables. A key of the
//!    wrong length stops the process here, before anything is served.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP spans).
//! 3. Move the key out of [`Config`] (wiping the encoded copy), build
//!    [`AppState`] around it, and announce the exported operations.
//! 4. Build the Axum router and start the HTTP server.

mod config;
mod server;
mod telemetry;

use anyhow::Result;
use tracing::info;

use config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let mut cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        environment = %cfg.environment,
        "textseal starting"
    );

    // -----------------------------------------------------------------------
    // 3. Key material and exports
    // -----------------------------------------------------------------------
    let key = cfg.take_key_material()?;
    info!(key_hash = %key.info().key_hash, "encryption key loaded");
    let state = AppState::new(key, cfg.environment.clone());
    state.exports.announce();

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let router = server::router::build(state, cfg.allowed_origins()?);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
