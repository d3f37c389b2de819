//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::Rejected`] → 400
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The submitted message could not be decoded or authenticated.
    ///
    /// Decode failures and tag mismatches share this variant so callers
    /// cannot tell which stage rejected the message.
    #[error("message could not be authenticated")]
    Rejected,

    /// An unexpected internal error occurred (bad key material, RNG failure).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::Rejected => 400,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code placed in the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Rejected => "rejected",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
