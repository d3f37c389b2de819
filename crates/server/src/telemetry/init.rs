//! Tracing subscriber initialisation: JSON logs filtered by `RUST_LOG` / `LOG_LEVEL`.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// Configures:
/// - An [`EnvFilter`] read from `RUST_LOG`, or built from `log_level` when unset.
/// - A JSON-formatted [`tracing_subscriber`] layer for structured log output.
///
/// # Errors
///
/// Returns an error if `log_level` is not a valid filter or a global subscriber
/// is already installed.
pub fn init_telemetry(log_level: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid LOG_LEVEL filter: {log_level}"))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .context("failed to initialise tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_filter() {
        // Only reached when RUST_LOG is unset; otherwise the env filter wins.
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(init_telemetry("sealbox=loudest").is_err());
        }
    }
}
