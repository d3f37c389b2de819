//! Encrypt-then-MAC authenticated encryption with a JSON wire envelope.
//!
//! A payload is encrypted under AES in a feedback mode with a fresh random IV,
//! and the IV-prefixed ciphertext is authenticated with HMAC. The receiving side
//! verifies the tag in constant time before any decryption runs.
//!
//! # Ciphertext format
//!
//! ```text
//! ciphertext = iv (16 bytes) || cipher output (len(plaintext) bytes)
//! tag        = HMAC(key, ciphertext)
//! envelope   = {"ciphertext": base64(ciphertext), "hmac": base64(tag)}
//! ```
//!
//! The same key feeds both the cipher and the MAC.

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod primitive;
pub mod suite;

pub use cipher::{AuthenticatedCipher, DefaultCipher, SealedMessage};
pub use error::CryptoError;
pub use primitive::{AesCfb, AesCfb8, FeedbackCipher, HmacSha256, HmacSha512, MacAlgorithm};
pub use suite::{CipherSuite, Sealer};

/// AES key lengths accepted by the cipher primitives (AES-128/192/256).
pub const AES_KEY_LENS: [usize; 3] = [16, 24, 32];
