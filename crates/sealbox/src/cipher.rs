//! The encrypt-then-MAC composition.
//!
//! [`AuthenticatedCipher`] is parameterised by its cipher and MAC primitives,
//! so several configurations can coexist in one process without global state.
//! It carries no data; every operation takes the key explicitly.
//!
//! **Verification discipline:** [`AuthenticatedCipher::open`] checks the tag in
//! constant time and returns [`CryptoError::AuthenticationFailed`] without
//! touching the cipher when it does not match.

use std::fmt;
use std::marker::PhantomData;

use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::error::CryptoError;
use crate::primitive::{AesCfb, FeedbackCipher, HmacSha256, MacAlgorithm};

/// AES-CFB-128 with HMAC-SHA256: the interoperable default.
pub type DefaultCipher = AuthenticatedCipher<AesCfb, HmacSha256>;

/// A ciphertext and the tag that authenticates it.
///
/// Only authentic once [`AuthenticatedCipher::verify_tag`] accepts the pair.
#[derive(Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// IV followed by the cipher output.
    pub ciphertext: Vec<u8>,
    /// MAC over the whole `ciphertext`, IV included.
    pub tag: Vec<u8>,
}

impl fmt::Debug for SealedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedMessage")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("tag_len", &self.tag.len())
            .finish()
    }
}

/// Encrypt-then-MAC over a feedback cipher `C` and a MAC `M`.
pub struct AuthenticatedCipher<C, M> {
    // fn() keeps the type Send + Sync regardless of C and M.
    _primitives: PhantomData<fn() -> (C, M)>,
}

impl<C, M> AuthenticatedCipher<C, M>
where
    C: FeedbackCipher,
    M: MacAlgorithm,
{
    /// Create the composition. No work happens until an operation is called.
    pub const fn new() -> Self {
        Self {
            _primitives: PhantomData,
        }
    }

    /// IV length prefixed to every ciphertext.
    pub const fn iv_len(&self) -> usize {
        C::IV_LEN
    }

    /// Length of the tags this composition produces.
    pub const fn tag_len(&self) -> usize {
        M::TAG_LEN
    }

    /// Encrypt `plaintext` under a fresh random IV.
    ///
    /// Returns `iv || cipher output`. The result is **not** authenticated; use
    /// [`Self::seal`] unless the tag is computed separately.
    ///
    /// # Errors
    ///
    /// [`CryptoError::InvalidKey`] if the cipher rejects the key,
    /// [`CryptoError::RandomSource`] if the OS RNG fails.
    pub fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        C::validate_key(key)?;
        let mut out = vec![0u8; C::IV_LEN + plaintext.len()];
        let (iv, body) = out.split_at_mut(C::IV_LEN);

        OsRng
            .try_fill_bytes(iv)
            .map_err(|e| CryptoError::RandomSource(e.to_string()))?;

        body.copy_from_slice(plaintext);
        C::encrypt_in_place(key, iv, body)?;
        Ok(out)
    }

    /// Decrypt an `iv || body` blob produced by [`Self::encrypt`].
    ///
    /// Performs no authentication; call only on ciphertext whose tag has been
    /// verified. [`Self::open`] does both.
    ///
    /// # Errors
    ///
    /// [`CryptoError::InvalidKey`] if the cipher rejects the key,
    /// [`CryptoError::Malformed`] if `blob` is shorter than one IV.
    pub fn decrypt(&self, key: &[u8], blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
        C::validate_key(key)?;
        if blob.len() < C::IV_LEN {
            return Err(CryptoError::Malformed {
                expected: C::IV_LEN,
                actual: blob.len(),
            });
        }

        let (iv, body) = blob.split_at(C::IV_LEN);
        let mut out = body.to_vec();
        C::decrypt_in_place(key, iv, &mut out)?;
        Ok(out)
    }

    /// Compute the MAC of `message` under `key`.
    pub fn tag(&self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        M::compute(key, message)
    }

    /// Whether `candidate` is the MAC of `message` under `key`.
    ///
    /// The comparison is constant-time in the position of the first differing
    /// byte. A mismatch, a wrong-length candidate, or a key the MAC rejects all
    /// yield `false`.
    pub fn verify_tag(&self, key: &[u8], message: &[u8], candidate: &[u8]) -> bool {
        match M::compute(key, message) {
            // ct_eq on slices returns 0 for unequal lengths without comparing contents.
            Ok(expected) => bool::from(expected.as_slice().ct_eq(candidate)),
            Err(_) => false,
        }
    }

    /// Encrypt `plaintext`, then tag the IV-prefixed ciphertext.
    pub fn seal(&self, key: &[u8], plaintext: &[u8]) -> Result<SealedMessage, CryptoError> {
        let ciphertext = self.encrypt(key, plaintext)?;
        let tag = self.tag(key, &ciphertext)?;
        Ok(SealedMessage { ciphertext, tag })
    }

    /// Verify `tag` over `ciphertext`, and decrypt only if it matches.
    ///
    /// # Errors
    ///
    /// [`CryptoError::AuthenticationFailed`] on a tag mismatch; decryption is
    /// never attempted in that case. Otherwise any error from [`Self::decrypt`].
    pub fn open(&self, key: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if !self.verify_tag(key, ciphertext, tag) {
            tracing::debug!(
                ciphertext_len = ciphertext.len(),
                tag_len = tag.len(),
                "tag verification failed"
            );
            return Err(CryptoError::AuthenticationFailed);
        }
        self.decrypt(key, ciphertext)
    }

    /// [`Self::open`] over a [`SealedMessage`].
    pub fn open_sealed(&self, key: &[u8], sealed: &SealedMessage) -> Result<Vec<u8>, CryptoError> {
        self.open(key, &sealed.ciphertext, &sealed.tag)
    }
}

impl<C, M> Default for AuthenticatedCipher<C, M>
where
    C: FeedbackCipher,
    M: MacAlgorithm,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, M> Clone for AuthenticatedCipher<C, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, M> Copy for AuthenticatedCipher<C, M> {}

impl<C, M> fmt::Debug for AuthenticatedCipher<C, M>
where
    C: FeedbackCipher,
    M: MacAlgorithm,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedCipher")
            .field("cipher", &C::NAME)
            .field("mac", &M::NAME)
            .finish()
    }
}
