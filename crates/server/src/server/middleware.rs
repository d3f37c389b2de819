//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, body size limits, and
//! response compression.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cap on request bodies. Larger bodies are answered with `413`.
pub fn body_limit(max_body_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_body_bytes)
}
