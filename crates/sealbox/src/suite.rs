//! Named cipher suites and an object-safe view over [`AuthenticatedCipher`].
//!
//! [`AuthenticatedCipher`] picks its primitives at compile time. A service that
//! selects the suite from configuration holds an `Arc<dyn Sealer>` instead.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::cipher::{AuthenticatedCipher, SealedMessage};
use crate::error::CryptoError;
use crate::primitive::{AesCfb, AesCfb8, FeedbackCipher, HmacSha256, HmacSha512, MacAlgorithm};

/// Dynamic interface to a configured encrypt-then-MAC composition.
pub trait Sealer: Send + Sync {
    /// Suite name, e.g. `"aes-cfb-hmac-sha256"`.
    fn suite(&self) -> String;

    /// Length of the tags this suite produces.
    fn tag_len(&self) -> usize;

    /// See [`AuthenticatedCipher::seal`].
    fn seal(&self, key: &[u8], plaintext: &[u8]) -> Result<SealedMessage, CryptoError>;

    /// See [`AuthenticatedCipher::open`].
    fn open(&self, key: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// See [`AuthenticatedCipher::encode`].
    fn encode(&self, key: &[u8], plaintext: &[u8]) -> Result<String, CryptoError>;

    /// See [`AuthenticatedCipher::decode`].
    fn decode(&self, key: &[u8], text: &str) -> Result<Vec<u8>, CryptoError>;

    /// See [`AuthenticatedCipher::decode_bytes`].
    fn decode_bytes(&self, key: &[u8], bytes: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

impl<C, M> Sealer for AuthenticatedCipher<C, M>
where
    C: FeedbackCipher,
    M: MacAlgorithm,
{
    fn suite(&self) -> String {
        format!("{}-{}", C::NAME, M::NAME)
    }

    fn tag_len(&self) -> usize {
        M::TAG_LEN
    }

    fn seal(&self, key: &[u8], plaintext: &[u8]) -> Result<SealedMessage, CryptoError> {
        AuthenticatedCipher::seal(self, key, plaintext)
    }

    fn open(&self, key: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>, CryptoError> {
        AuthenticatedCipher::open(self, key, ciphertext, tag)
    }

    fn encode(&self, key: &[u8], plaintext: &[u8]) -> Result<String, CryptoError> {
        AuthenticatedCipher::encode(self, key, plaintext)
    }

    fn decode(&self, key: &[u8], text: &str) -> Result<Vec<u8>, CryptoError> {
        AuthenticatedCipher::decode(self, key, text)
    }

    fn decode_bytes(&self, key: &[u8], bytes: &[u8]) -> Result<Vec<u8>, CryptoError> {
        AuthenticatedCipher::decode_bytes(self, key, bytes)
    }
}

/// The supported (cipher mode, MAC) pairings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CipherSuite {
    /// AES-CFB-128 + HMAC-SHA256. Interoperates with Go `crypto/cipher` and
    /// Node `aes-*-cfb` peers.
    #[default]
    AesCfbHmacSha256,
    /// AES-CFB-8 + HMAC-SHA256. PyCryptodome's default CFB segment size.
    AesCfb8HmacSha256,
    /// AES-CFB-128 + HMAC-SHA512 (64-byte tags).
    AesCfbHmacSha512,
}

impl CipherSuite {
    /// Every supported suite, default first.
    pub const ALL: [CipherSuite; 3] = [
        CipherSuite::AesCfbHmacSha256,
        CipherSuite::AesCfb8HmacSha256,
        CipherSuite::AesCfbHmacSha512,
    ];

    /// Canonical configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            CipherSuite::AesCfbHmacSha256 => "aes-cfb-hmac-sha256",
            CipherSuite::AesCfb8HmacSha256 => "aes-cfb8-hmac-sha256",
            CipherSuite::AesCfbHmacSha512 => "aes-cfb-hmac-sha512",
        }
    }

    /// Build the composition for this suite.
    pub fn sealer(self) -> Arc<dyn Sealer> {
        match self {
            CipherSuite::AesCfbHmacSha256 => Arc::new(AuthenticatedCipher::<AesCfb, HmacSha256>::new()),
            CipherSuite::AesCfb8HmacSha256 => Arc::new(AuthenticatedCipher::<AesCfb8, HmacSha256>::new()),
            CipherSuite::AesCfbHmacSha512 => Arc::new(AuthenticatedCipher::<AesCfb, HmacSha512>::new()),
        }
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherSuite {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|suite| suite.name() == wanted)
            .ok_or_else(|| CryptoError::UnknownSuite(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for suite in CipherSuite::ALL {
            assert_eq!(suite.name().parse::<CipherSuite>().unwrap(), suite);
            assert_eq!(suite.to_string(), suite.name());
        }
    }

    #[test]
    fn from_str_is_case_and_space_insensitive() {
        assert_eq!(
            " AES-CFB-HMAC-SHA256 ".parse::<CipherSuite>().unwrap(),
            CipherSuite::AesCfbHmacSha256
        );
    }

    #[test]
    fn unknown_suite_rejected() {
        assert!(matches!(
            "aes-gcm".parse::<CipherSuite>(),
            Err(CryptoError::UnknownSuite(name)) if name == "aes-gcm"
        ));
    }

    #[test]
    fn default_is_sha256_cfb() {
        assert_eq!(CipherSuite::default(), CipherSuite::AesCfbHmacSha256);
    }

    #[test]
    fn sealers_report_their_suite() {
        for suite in CipherSuite::ALL {
            let sealer = suite.sealer();
            assert_eq!(sealer.suite(), suite.name());
        }
        assert_eq!(CipherSuite::AesCfbHmacSha512.sealer().tag_len(), 64);
        assert_eq!(CipherSuite::AesCfb8HmacSha256.sealer().tag_len(), 32);
    }

    #[test]
    fn every_suite_round_trips_through_the_trait_object() {
        let key = [0x42u8; 32];
        for suite in CipherSuite::ALL {
            let sealer = suite.sealer();
            let sealed = sealer.seal(&key, b"via dyn").unwrap();
            assert_eq!(sealed.tag.len(), sealer.tag_len());
            assert_eq!(sealer.open(&key, &sealed.ciphertext, &sealed.tag).unwrap(), b"via dyn");

            let text = sealer.encode(&key, b"via json").unwrap();
            assert_eq!(sealer.decode(&key, &text).unwrap(), b"via json");
        }
    }

    #[test]
    fn suites_do_not_accept_each_others_envelopes() {
        let key = [0x42u8; 16];
        let text = CipherSuite::AesCfbHmacSha256.sealer().encode(&key, b"x").unwrap();
        assert!(matches!(
            CipherSuite::AesCfbHmacSha512.sealer().decode(&key, &text),
            Err(CryptoError::AuthenticationFailed)
        ));
    }
}
