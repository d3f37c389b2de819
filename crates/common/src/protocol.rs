//! Request and response types exchanged between components.
//!
//! [`Envelope`] is the interoperable wire form of a sealed message; the other
//! types are bodies returned by the HTTP service.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sealed message envelope
// ---------------------------------------------------------------------------

/// JSON wire form of a sealed message.
///
/// ```json
/// {"ciphertext": "<base64(iv || body)>", "hmac": "<base64(tag)>"}
/// ```
///
/// Both fields hold standard, padded base64. The field names are fixed so that
/// other implementations of the format can consume it. Unknown fields are
/// ignored when deserialising.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64 of the IV-prefixed ciphertext.
    pub ciphertext: String,
    /// Base64 of the MAC computed over the raw ciphertext.
    pub hmac: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"rejected"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status, always `"ok"` once the server is accepting requests.
    pub status: String,
    /// Name of the configured cipher suite.
    pub suite: String,
    /// Length in bytes of the tags the suite produces.
    pub tag_len: usize,
}
