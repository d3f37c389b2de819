//! Capability traits over the external cipher and MAC primitives, and their
//! RustCrypto-backed implementations.
//!
//! The composition in [`crate::cipher`] only needs two things from a primitive:
//! "run the feedback-mode cipher over a buffer given `(key, iv)`" and "compute a
//! keyed digest". Everything else (block cipher rounds, hash compression) lives
//! in the `aes`, `cfb-mode`, `cfb8`, `hmac` and `sha2` crates.

use aes::cipher::{AsyncStreamCipher, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

use crate::error::CryptoError;

/// AES block size, and therefore the IV length of every AES feedback mode here.
pub const AES_BLOCK_LEN: usize = 16;

/// A self-synchronising feedback-mode cipher driven by an explicit IV.
///
/// Output length always equals input length; there is no padding.
pub trait FeedbackCipher {
    /// IV length in bytes (the underlying block size).
    const IV_LEN: usize;

    /// Short name used in suite identifiers, e.g. `"aes-cfb"`.
    const NAME: &'static str;

    /// Reject keys the cipher cannot use, without touching any data.
    fn validate_key(_key: &[u8]) -> Result<(), CryptoError> {
        Ok(())
    }

    /// Encrypt `buf` in place.
    fn encrypt_in_place(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>;

    /// Decrypt `buf` in place.
    fn decrypt_in_place(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>;
}

/// A keyed message-authentication function with a fixed output length.
pub trait MacAlgorithm {
    /// Tag length in bytes.
    const TAG_LEN: usize;

    /// Short name used in suite identifiers, e.g. `"hmac-sha256"`.
    const NAME: &'static str;

    /// Compute the tag of `message` under `key`.
    fn compute(key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

// ---------------------------------------------------------------------------
// AES feedback modes
// ---------------------------------------------------------------------------

/// AES in full-block CFB mode (CFB-128), key size picked from the key length.
///
/// This is the mode used by Go's `cipher.NewCFBEncrypter` and OpenSSL's
/// `aes-*-cfb`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesCfb;

/// AES in CFB-8 mode (one byte of feedback per step).
#[derive(Debug, Clone, Copy, Default)]
pub struct AesCfb8;

impl FeedbackCipher for AesCfb {
    const IV_LEN: usize = AES_BLOCK_LEN;
    const NAME: &'static str = "aes-cfb";

    fn validate_key(key: &[u8]) -> Result<(), CryptoError> {
        validate_aes_key(key)
    }

    fn encrypt_in_place(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
        match key.len() {
            16 => encrypt_with::<cfb_mode::Encryptor<Aes128>>(key, iv, buf),
            24 => encrypt_with::<cfb_mode::Encryptor<Aes192>>(key, iv, buf),
            32 => encrypt_with::<cfb_mode::Encryptor<Aes256>>(key, iv, buf),
            len => Err(CryptoError::InvalidKey { len }),
        }
    }

    fn decrypt_in_place(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
        match key.len() {
            16 => decrypt_with::<cfb_mode::Decryptor<Aes128>>(key, iv, buf),
            24 => decrypt_with::<cfb_mode::Decryptor<Aes192>>(key, iv, buf),
            32 => decrypt_with::<cfb_mode::Decryptor<Aes256>>(key, iv, buf),
            len => Err(CryptoError::InvalidKey { len }),
        }
    }
}

impl FeedbackCipher for AesCfb8 {
    const IV_LEN: usize = AES_BLOCK_LEN;
    const NAME: &'static str = "aes-cfb8";

    fn validate_key(key: &[u8]) -> Result<(), CryptoError> {
        validate_aes_key(key)
    }

    fn encrypt_in_place(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
        match key.len() {
            16 => encrypt_with::<cfb8::Encryptor<Aes128>>(key, iv, buf),
            24 => encrypt_with::<cfb8::Encryptor<Aes192>>(key, iv, buf),
            32 => encrypt_with::<cfb8::Encryptor<Aes256>>(key, iv, buf),
            len => Err(CryptoError::InvalidKey { len }),
        }
    }

    fn decrypt_in_place(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
        match key.len() {
            16 => decrypt_with::<cfb8::Decryptor<Aes128>>(key, iv, buf),
            24 => decrypt_with::<cfb8::Decryptor<Aes192>>(key, iv, buf),
            32 => decrypt_with::<cfb8::Decryptor<Aes256>>(key, iv, buf),
            len => Err(CryptoError::InvalidKey { len }),
        }
    }
}

fn validate_aes_key(key: &[u8]) -> Result<(), CryptoError> {
    if crate::AES_KEY_LENS.contains(&key.len()) {
        Ok(())
    } else {
        Err(CryptoError::InvalidKey { len: key.len() })
    }
}

fn encrypt_with<E>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>
where
    E: KeyIvInit + AsyncStreamCipher + BlockEncryptMut,
{
    // The IV is always IV_LEN here, so a length error can only come from the key.
    let cipher = E::new_from_slices(key, iv).map_err(|_| CryptoError::InvalidKey { len: key.len() })?;
    cipher.encrypt(buf);
    Ok(())
}

fn decrypt_with<D>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError>
where
    D: KeyIvInit + AsyncStreamCipher + BlockDecryptMut,
{
    let cipher = D::new_from_slices(key, iv).map_err(|_| CryptoError::InvalidKey { len: key.len() })?;
    cipher.decrypt(buf);
    Ok(())
}

// ---------------------------------------------------------------------------
// HMAC
// ---------------------------------------------------------------------------

/// HMAC with SHA-256 (32-byte tags).
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha256;

/// HMAC with SHA-512 (64-byte tags).
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha512;

impl MacAlgorithm for HmacSha256 {
    const TAG_LEN: usize = 32;
    const NAME: &'static str = "hmac-sha256";

    fn compute(key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        keyed_digest::<Hmac<Sha256>>(key, message)
    }
}

impl MacAlgorithm for HmacSha512 {
    const TAG_LEN: usize = 64;
    const NAME: &'static str = "hmac-sha512";

    fn compute(key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        keyed_digest::<Hmac<Sha512>>(key, message)
    }
}

fn keyed_digest<M>(key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError>
where
    M: Mac + KeyInit,
{
    let mut mac = <M as Mac>::new_from_slice(key).map_err(|_| CryptoError::InvalidKey { len: key.len() })?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
