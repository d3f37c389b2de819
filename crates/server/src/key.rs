//! [`KeyBytes`]: the service's symmetric key, loaded once from configuration.
//!
//! # Security invariants
//!
//! - The key is **never** logged, traced, or included in error messages.
//! - The buffer is zeroed when the last owner drops it.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sealbox::AES_KEY_LENS;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors produced while loading key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The configured value decoded to zero bytes.
    #[error("zero-length AES key")]
    Empty,

    /// The decoded key is not an AES key size.
    #[error("AES key must be 16, 24, or 32 bytes, got {0}")]
    InvalidLength(usize),

    /// The configured value is not standard base64.
    #[error("AES key is not valid base64")]
    InvalidEncoding,
}

/// Owned key bytes, zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyBytes(Vec<u8>);

impl KeyBytes {
    /// Decode a standard-base64 key and check its length.
    ///
    /// # Errors
    ///
    /// See [`KeyError`]. The error never echoes the input.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let mut raw = STANDARD
            .decode(encoded.trim())
            .map_err(|_| KeyError::InvalidEncoding)?;
        match raw.len() {
            0 => Err(KeyError::Empty),
            n if AES_KEY_LENS.contains(&n) => Ok(Self(raw)),
            n => {
                raw.zeroize();
                Err(KeyError::InvalidLength(n))
            }
        }
    }

    /// Borrow the raw key bytes for a cryptographic call.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a successfully loaded key.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
impl From<[u8; 16]> for KeyBytes {
    fn from(raw: [u8; 16]) -> Self {
        Self(raw.to_vec())
    }
}

impl std::fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("KeyBytes([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_aes_length() {
        for len in AES_KEY_LENS {
            let encoded = STANDARD.encode(vec![7u8; len]);
            let key = KeyBytes::from_base64(&encoded).unwrap();
            assert_eq!(key.len(), len);
            assert_eq!(key.expose(), vec![7u8; len].as_slice());
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let encoded = format!("  {}\n", STANDARD.encode([1u8; 32]));
        assert_eq!(KeyBytes::from_base64(&encoded).unwrap().len(), 32);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(KeyBytes::from_base64("").unwrap_err(), KeyError::Empty);
    }

    #[test]
    fn rejects_odd_lengths() {
        let encoded = STANDARD.encode([0u8; 42]);
        assert_eq!(
            KeyBytes::from_base64(&encoded).unwrap_err(),
            KeyError::InvalidLength(42)
        );
    }

    #[test]
    fn rejects_bad_base64() {
        assert_eq!(
            KeyBytes::from_base64("***").unwrap_err(),
            KeyError::InvalidEncoding
        );
    }

    #[test]
    fn debug_is_redacted() {
        let key = KeyBytes::from([0xAB; 16]);
        assert_eq!(format!("{key:?}"), "KeyBytes([REDACTED])");
    }
}
