//! JSON envelope encoding of sealed messages.
//!
//! # Wire format
//!
//! ```text
//! {"ciphertext": "<standard base64>", "hmac": "<standard base64>"}
//! ```
//!
//! Decoding rejects malformed input with [`CryptoError::Decode`] before the
//! cipher runs. A rejected input still pays for one MAC pass over its bytes, so
//! decode failures and tag mismatches take comparable time. Unknown fields are
//! ignored.

use std::io::{Read, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::Envelope;

use crate::cipher::{AuthenticatedCipher, SealedMessage};
use crate::error::CryptoError;
use crate::primitive::{FeedbackCipher, MacAlgorithm};

impl SealedMessage {
    /// Base64-encode both parts into the wire [`Envelope`].
    pub fn to_envelope(&self) -> Envelope {
        Envelope {
            ciphertext: STANDARD.encode(&self.ciphertext),
            hmac: STANDARD.encode(&self.tag),
        }
    }

    /// Decode the base64 fields of an [`Envelope`].
    ///
    /// # Errors
    ///
    /// [`CryptoError::Decode`] if either field is not valid standard base64.
    pub fn from_envelope(envelope: &Envelope) -> Result<Self, CryptoError> {
        let ciphertext = STANDARD
            .decode(&envelope.ciphertext)
            .map_err(|e| CryptoError::Decode(format!("ciphertext: {e}")))?;
        let tag = STANDARD
            .decode(&envelope.hmac)
            .map_err(|e| CryptoError::Decode(format!("hmac: {e}")))?;
        Ok(Self { ciphertext, tag })
    }
}

impl<C, M> AuthenticatedCipher<C, M>
where
    C: FeedbackCipher,
    M: MacAlgorithm,
{
    /// Seal `plaintext` and serialise it as an envelope JSON string.
    pub fn encode(&self, key: &[u8], plaintext: &[u8]) -> Result<String, CryptoError> {
        let envelope = self.seal(key, plaintext)?.to_envelope();
        serde_json::to_string(&envelope).map_err(serialise_error)
    }

    /// Parse an envelope JSON string, verify it, and return the plaintext.
    ///
    /// # Errors
    ///
    /// [`CryptoError::Decode`] for invalid JSON, missing fields or bad base64;
    /// otherwise the result of [`AuthenticatedCipher::open`].
    pub fn decode(&self, key: &[u8], text: &str) -> Result<Vec<u8>, CryptoError> {
        self.decode_bytes(key, text.as_bytes())
    }

    /// [`Self::decode`] over raw bytes. Input that is not UTF-8 is a
    /// [`CryptoError::Decode`].
    pub fn decode_bytes(&self, key: &[u8], bytes: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let sealed = serde_json::from_slice::<Envelope>(bytes)
            .map_err(|e| CryptoError::Decode(e.to_string()))
            .and_then(|envelope| SealedMessage::from_envelope(&envelope));

        match sealed {
            Ok(sealed) => self.open_sealed(key, &sealed),
            Err(e) => {
                let _ = std::hint::black_box(self.tag(key, bytes));
                Err(e)
            }
        }
    }

    /// Seal `plaintext` and write the envelope JSON to `writer`.
    ///
    /// # Errors
    ///
    /// As [`Self::seal`], plus [`CryptoError::Io`] if the writer fails.
    pub fn encode_to_writer<W: Write>(
        &self,
        key: &[u8],
        plaintext: &[u8],
        writer: W,
    ) -> Result<(), CryptoError> {
        let envelope = self.seal(key, plaintext)?.to_envelope();
        serde_json::to_writer(writer, &envelope).map_err(serialise_error)
    }

    /// Read one envelope JSON document from `reader`, verify it, and return
    /// the plaintext.
    ///
    /// # Errors
    ///
    /// [`CryptoError::Io`] if the reader fails, otherwise as [`Self::decode`].
    pub fn decode_from_reader<R: Read>(
        &self,
        key: &[u8],
        mut reader: R,
    ) -> Result<Vec<u8>, CryptoError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.decode_bytes(key, &buf)
    }

    /// Verify and decrypt an already-parsed [`Envelope`].
    pub fn open_envelope(&self, key: &[u8], envelope: &Envelope) -> Result<Vec<u8>, CryptoError> {
        let sealed = SealedMessage::from_envelope(envelope)?;
        self.open_sealed(key, &sealed)
    }
}

// Only a failing writer is a transport error.
fn serialise_error(e: serde_json::Error) -> CryptoError {
    if e.is_io() {
        CryptoError::Io(e.into())
    } else {
        CryptoError::Encode(e.to_string())
    }
}
