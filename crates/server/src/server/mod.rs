//! Axum HTTP(S) server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with the `/crypto/*` routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.
//! - Optionally terminate TLS with rustls in front of the router.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tls;

use tracing::{info, warn};

/// Resolves once the process receives Ctrl-C.
///
/// If the signal handler cannot be installed the future never resolves and the
/// server runs until killed.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
