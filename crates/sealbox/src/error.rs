//! Error type for every fallible operation in the crate.

use thiserror::Error;

/// Errors produced by the cipher, MAC and envelope layers.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The primitive rejected the key (AES accepts 16, 24 or 32 bytes).
    #[error("invalid key length: {len} bytes")]
    InvalidKey { len: usize },

    /// The ciphertext blob is too short to hold an IV.
    #[error("ciphertext too short: expected at least {expected} bytes, got {actual}")]
    Malformed { expected: usize, actual: usize },

    /// The tag does not match the ciphertext under this key.
    ///
    /// An expected outcome for tampered data or a wrong key, not a bug.
    #[error("authentication failed: tag does not match ciphertext")]
    AuthenticationFailed,

    /// The envelope is not valid JSON, lacks a field, or holds invalid base64.
    #[error("envelope decode failed: {0}")]
    Decode(String),

    /// The envelope could not be serialised.
    #[error("envelope encode failed: {0}")]
    Encode(String),

    /// The operating system random source failed to produce an IV.
    #[error("secure random source failed: {0}")]
    RandomSource(String),

    /// Reading or writing an envelope stream failed.
    #[error("envelope I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// No cipher suite is registered under this name.
    #[error("unknown cipher suite: {0}")]
    UnknownSuite(String),
}

impl CryptoError {
    /// Whether this error rejects the submitted message itself.
    ///
    /// Covers decode failures, short blobs and tag mismatches. Callers should
    /// answer all of them identically.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CryptoError::Malformed { .. } | CryptoError::AuthenticationFailed | CryptoError::Decode(_)
        )
    }
}
