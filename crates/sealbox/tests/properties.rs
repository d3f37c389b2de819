//! Property tests for the seal/open and encode/decode contracts.

use proptest::prelude::*;
use sealbox::{CipherSuite, CryptoError, DefaultCipher, Sealer};

const CIPHER: DefaultCipher = DefaultCipher::new();

fn aes_key() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 16),
        prop::collection::vec(any::<u8>(), 24),
        prop::collection::vec(any::<u8>(), 32),
    ]
}

// HMAC zero-pads short keys, so a key and its zero-extension share a MAC key.
fn same_mac_key(a: &[u8], b: &[u8]) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    long.starts_with(short) && long[short.len()..].iter().all(|&byte| byte == 0)
}

fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

proptest! {
    #[test]
    fn open_inverts_seal(key in aes_key(), plaintext in payload()) {
        let sealed = CIPHER.seal(&key, &plaintext).unwrap();
        prop_assert_eq!(sealed.ciphertext.len(), 16 + plaintext.len());
        prop_assert_eq!(CIPHER.open(&key, &sealed.ciphertext, &sealed.tag).unwrap(), plaintext);
    }

    #[test]
    fn decode_inverts_encode(key in aes_key(), plaintext in payload()) {
        let text = CIPHER.encode(&key, &plaintext).unwrap();
        prop_assert_eq!(CIPHER.decode(&key, &text).unwrap(), plaintext);
    }

    #[test]
    fn any_ciphertext_bit_flip_is_rejected(
        key in aes_key(),
        plaintext in payload(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut sealed = CIPHER.seal(&key, &plaintext).unwrap();
        let idx = position.index(sealed.ciphertext.len());
        sealed.ciphertext[idx] ^= 1 << bit;
        prop_assert!(matches!(
            CIPHER.open_sealed(&key, &sealed),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn any_tag_bit_flip_is_rejected(
        key in aes_key(),
        plaintext in payload(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut sealed = CIPHER.seal(&key, &plaintext).unwrap();
        let idx = position.index(sealed.tag.len());
        sealed.tag[idx] ^= 1 << bit;
        prop_assert!(matches!(
            CIPHER.open_sealed(&key, &sealed),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn distinct_mac_key_is_rejected(key1 in aes_key(), key2 in aes_key(), plaintext in payload()) {
        prop_assume!(!same_mac_key(&key1, &key2));
        let sealed = CIPHER.seal(&key1, &plaintext).unwrap();
        prop_assert!(matches!(
            CIPHER.open_sealed(&key2, &sealed),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn arbitrary_text_never_panics(key in aes_key(), text in ".{0,200}") {
        // Random text is never a valid envelope for this key.
        let err = CIPHER.decode(&key, &text).unwrap_err();
        prop_assert!(err.is_rejection());
    }

    #[test]
    fn every_suite_round_trips(key in aes_key(), plaintext in payload()) {
        for suite in CipherSuite::ALL {
            let sealer = suite.sealer();
            let text = sealer.encode(&key, &plaintext).unwrap();
            prop_assert_eq!(sealer.decode(&key, &text).unwrap(), plaintext.clone());
        }
    }
}
