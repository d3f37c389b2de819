//! Configuration loading and validation for the sealbox service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use sealbox::CipherSuite;
use serde::Deserialize;

use crate::key::KeyBytes;

/// Validated service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Standard base64 encoding of the AES key (16, 24 or 32 bytes). **Required.**
    pub aes_key: String,

    /// Name of the cipher suite used for every request.
    #[serde(default = "default_cipher_suite")]
    pub cipher_suite: String,

    /// IP address the server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Port the server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// PEM certificate chain. Set together with `tls_key_path` to serve HTTPS.
    #[serde(default)]
    pub tls_cert_path: Option<String>,

    /// PEM private key. Set together with `tls_cert_path` to serve HTTPS.
    #[serde(default)]
    pub tls_key_path: Option<String>,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Tracing log level (e.g. `"info"`, `"debug"`), used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_cipher_suite() -> String {
    CipherSuite::default().name().into()
}
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}
fn default_listen_port() -> u16 {
    8000
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}
fn default_log_level() -> String {
    "info".into()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("aes_key", &"[REDACTED]")
            .field("cipher_suite", &self.cipher_suite)
            .field("listen_addr", &self.listen_addr)
            .field("listen_port", &self.listen_port)
            .field("tls_cert_path", &self.tls_cert_path)
            .field("tls_key_path", &self.tls_key_path)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode the configured key.
    pub fn key(&self) -> Result<KeyBytes> {
        KeyBytes::from_base64(&self.aes_key).context("AES_KEY is invalid")
    }

    /// Parse the configured cipher suite.
    pub fn suite(&self) -> Result<CipherSuite> {
        self.cipher_suite
            .parse::<CipherSuite>()
            .with_context(|| format!("CIPHER_SUITE must be one of {}", suite_names()))
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("LISTEN_ADDR is not an IP address: {}", self.listen_addr))?;
        Ok(SocketAddr::new(ip, self.listen_port))
    }

    /// Certificate and key paths when TLS is enabled.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.aes_key, "AES_KEY")?;
        self.key()?;
        self.suite()?;
        self.socket_addr()?;

        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => {
                ensure_non_empty(cert, "TLS_CERT_PATH")?;
                ensure_non_empty(key, "TLS_KEY_PATH")?;
            }
            (None, None) => {}
            _ => anyhow::bail!("TLS_CERT_PATH and TLS_KEY_PATH must be set together"),
        }

        if self.max_body_bytes == 0 {
            anyhow::bail!("MAX_BODY_BYTES must be > 0");
        }
        Ok(())
    }
}

fn suite_names() -> String {
    CipherSuite::ALL
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
