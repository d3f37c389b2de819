//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use sealbox::Sealer;

use crate::key::KeyBytes;

/// Application state shared across all request handlers.
///
/// Both fields are `Arc`-wrapped so Axum can clone the state per request
/// without copying key material.
#[derive(Clone)]
pub struct AppState {
    /// The configured encrypt-then-MAC suite.
    pub sealer: Arc<dyn Sealer>,
    /// The symmetric key used for both encryption and authentication.
    pub key: Arc<KeyBytes>,
}

impl AppState {
    /// Create a new [`AppState`] from a suite and its key.
    pub fn new(sealer: Arc<dyn Sealer>, key: KeyBytes) -> Self {
        debug_assert!(!key.is_empty());
        Self {
            sealer,
            key: Arc::new(key),
        }
    }
}

#[cfg(test)]
impl Default for AppState {
    /// Default suite with an all-zero AES-128 key.
    fn default() -> Self {
        Self::new(sealbox::CipherSuite::default().sealer(), KeyBytes::from([0u8; 16]))
    }
}
