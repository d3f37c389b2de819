//! `sealbox-server`: HTTP service sealing and opening messages with one key.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise JSON tracing.
//! 3. Decode the key and build the configured cipher suite.
//! 4. Build the Axum router and serve it over plain TCP or TLS.

mod config;
mod key;
mod server;
mod telemetry;

use anyhow::{Context, Result};
use tracing::info;

use config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;

    // -----------------------------------------------------------------------
    // 3. Key and cipher suite
    // -----------------------------------------------------------------------
    let suite = cfg.suite()?;
    let key = cfg.key()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        suite = %suite,
        key_bits = key.len() * 8,
        tls = cfg.tls_paths().is_some(),
        "sealbox-server starting"
    );

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(suite.sealer(), key);
    let router = server::router::build(state, cfg.max_body_bytes);

    let addr = cfg.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    match cfg.tls_paths() {
        Some((cert_path, key_path)) => {
            let tls = server::tls::load_server_config(cert_path, key_path)?;
            server::tls::serve(listener, tls, router).await?;
        }
        None => {
            axum::serve(listener, router)
                .with_graceful_shutdown(server::shutdown_signal())
                .await?;
        }
    }

    Ok(())
}
