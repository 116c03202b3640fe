//! Integration tests for the sealbox public API.
//!
//! Exercises both constructs end to end through every encoding, the
//! combined wire form, size validation, and shared use across threads.

use sealbox_crypto::{
    Aead, Base16Encoder, Base64Encoder, CryptoError, Encoder, Encoding, HexEncoder, KeyMaterial,
    RawEncoder, SecretBox, UrlSafeBase64Encoder,
};
use std::sync::Arc;
use std::thread;

const KEY: [u8; 32] = [0x42; 32];

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_secretbox_roundtrip_random_nonce() {
    let secret_box = SecretBox::new(&KEY).unwrap();
    let message = secret_box.encrypt(b"attack at dawn").unwrap();

    assert_eq!(message.nonce().len(), SecretBox::NONCE_SIZE);
    assert_eq!(
        message.ciphertext().len(),
        b"attack at dawn".len() + SecretBox::MACBYTES
    );
    assert_eq!(secret_box.decrypt(&message).unwrap(), b"attack at dawn");
}

#[test]
fn test_aead_roundtrip_with_aad() {
    let aead = Aead::new(&KEY).unwrap();
    let message = aead.encrypt(b"attack at dawn", b"msg-id:7").unwrap();

    assert_eq!(aead.decrypt(&message, b"msg-id:7").unwrap(), b"attack at dawn");
    assert_eq!(
        aead.decrypt(&message, b"msg-id:8"),
        Err(CryptoError::AuthenticationFailure)
    );
}

#[test]
fn test_empty_plaintext() {
    let secret_box = SecretBox::new(&KEY).unwrap();
    let message = secret_box.encrypt(b"").unwrap();
    assert_eq!(message.ciphertext().len(), SecretBox::MACBYTES);
    assert!(secret_box.decrypt(&message).unwrap().is_empty());

    let aead = Aead::new(&KEY).unwrap();
    let message = aead.encrypt(b"", b"").unwrap();
    assert_eq!(message.ciphertext().len(), Aead::MACBYTES);
    assert!(aead.decrypt(&message, b"").unwrap().is_empty());
}

#[test]
fn test_random_nonces_differ() {
    let aead = Aead::new(&KEY).unwrap();
    let first = aead.encrypt(b"same", b"").unwrap();
    let second = aead.encrypt(b"same", b"").unwrap();

    assert_ne!(first.nonce(), second.nonce());
    assert_ne!(first.ciphertext(), second.ciphertext());
}

#[test]
fn test_explicit_nonce_is_deterministic() {
    let secret_box = SecretBox::new(&KEY).unwrap();
    let nonce = [9u8; 24];

    let first = secret_box.encrypt_with_nonce(b"same", &nonce).unwrap();
    let second = secret_box.encrypt_with_nonce(b"same", &nonce).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.nonce(), &nonce);
}

// ============================================================================
// Encodings
// ============================================================================

fn roundtrip_secretbox<E: Encoder>(encoder: &E) {
    let secret_box = SecretBox::new(&KEY).unwrap();
    let message = secret_box.encrypt_with(b"encoded", None, encoder).unwrap();

    // Each part decodes to the raw bytes it stands for
    let combined = encoder.decode(message.combined()).unwrap();
    let nonce = encoder.decode(message.nonce()).unwrap();
    let ciphertext = encoder.decode(message.ciphertext()).unwrap();
    assert_eq!(combined, [nonce.as_slice(), ciphertext.as_slice()].concat());

    assert_eq!(
        secret_box
            .decrypt_with(message.combined(), None, encoder)
            .unwrap(),
        b"encoded"
    );
    assert_eq!(
        secret_box
            .decrypt_with(message.ciphertext(), Some(&nonce), encoder)
            .unwrap(),
        b"encoded"
    );
}

#[test]
fn test_secretbox_all_encoders() {
    roundtrip_secretbox(&RawEncoder);
    roundtrip_secretbox(&HexEncoder);
    roundtrip_secretbox(&Base16Encoder);
    roundtrip_secretbox(&Base64Encoder);
    roundtrip_secretbox(&UrlSafeBase64Encoder);
}

#[test]
fn test_aead_runtime_encodings() {
    let aead = Aead::new(&KEY).unwrap();

    for encoding in Encoding::ALL {
        let message = aead
            .encrypt_with(b"runtime", b"aad", None, &encoding)
            .unwrap();
        let plaintext = aead
            .decrypt_with(message.combined(), b"aad", None, &encoding)
            .unwrap();
        assert_eq!(plaintext, b"runtime", "encoding {encoding}");
    }
}

#[test]
fn test_encoding_mismatch_is_rejected() {
    let aead = Aead::new(&KEY).unwrap();
    let message = aead.encrypt_with(b"data", b"", None, &HexEncoder).unwrap();

    // Lowercase hex is not valid strict base16
    assert!(matches!(
        aead.decrypt_with(message.combined(), b"", None, &Base16Encoder),
        Err(CryptoError::Encoding(_))
    ));
}

#[test]
fn test_keys_from_encoded_forms() {
    let hex_key = hex::encode(KEY);
    let from_hex = SecretBox::from_encoded(hex_key.as_bytes(), &HexEncoder).unwrap();
    let from_raw = SecretBox::new(&KEY).unwrap();
    assert_eq!(from_hex.key_bytes(), from_raw.key_bytes());

    let encoded = from_raw.encode_key(&Base64Encoder);
    let from_b64 = SecretBox::from_encoded(&encoded, &Base64Encoder).unwrap();
    assert_eq!(from_b64.key_bytes(), &KEY);

    let material = KeyMaterial::Integers(KEY.iter().map(|&b| i64::from(b)).collect());
    let from_ints = Aead::from_key_material(&material, &RawEncoder).unwrap();
    assert_eq!(from_ints.key_bytes(), &KEY);
}

// ============================================================================
// Size Validation
// ============================================================================

#[test]
fn test_wrong_key_sizes() {
    for len in [0usize, 16, 31, 33, 64] {
        let key = vec![0u8; len];
        let expected = Err(CryptoError::InvalidKeySize {
            expected: 32,
            actual: len,
        });
        assert_eq!(SecretBox::new(&key).map(|_| ()), expected);
        assert_eq!(Aead::new(&key).map(|_| ()), expected);
    }
}

#[test]
fn test_wrong_nonce_sizes() {
    let secret_box = SecretBox::new(&KEY).unwrap();
    let aead = Aead::new(&KEY).unwrap();

    for len in [0usize, 12, 23, 25] {
        let nonce = vec![0u8; len];
        let expected = CryptoError::InvalidNonceSize {
            expected: 24,
            actual: len,
        };
        assert_eq!(
            secret_box.encrypt_with_nonce(b"x", &nonce).unwrap_err(),
            expected
        );
        assert_eq!(
            aead.encrypt_with_nonce(b"x", b"", &nonce).unwrap_err(),
            expected
        );
        assert_eq!(
            secret_box.decrypt_with_nonce(&[0u8; 32], &nonce).unwrap_err(),
            expected
        );
    }
}

#[test]
fn test_short_combined_input() {
    let secret_box = SecretBox::new(&KEY).unwrap();

    assert_eq!(
        secret_box.decrypt(&[0u8; 10]),
        Err(CryptoError::InvalidNonceSize {
            expected: 24,
            actual: 10
        })
    );
    assert_eq!(
        secret_box.decrypt(&[0u8; 30]),
        Err(CryptoError::CiphertextTooShort {
            minimum: 16,
            actual: 6
        })
    );
}

// ============================================================================
// Tampering
// ============================================================================

#[test]
fn test_tampered_combined_form() {
    let secret_box = SecretBox::new(&KEY).unwrap();
    let combined = secret_box.encrypt(b"integrity").unwrap().into_combined();

    for index in [0, 23, 24, combined.len() - 1] {
        let mut tampered = combined.clone();
        tampered[index] ^= 0x01;
        assert_eq!(
            secret_box.decrypt(&tampered),
            Err(CryptoError::AuthenticationFailure),
            "byte {index}"
        );
    }
}

#[test]
fn test_wrong_key_fails() {
    let message = Aead::new(&KEY).unwrap().encrypt(b"secret", b"").unwrap();
    let other = Aead::new(&[0x43; 32]).unwrap();
    assert!(
        other
            .decrypt(&message, b"")
            .unwrap_err()
            .is_authentication_failure()
    );
}

#[test]
fn test_constructs_are_not_interchangeable() {
    let secret_box = SecretBox::new(&KEY).unwrap();
    let aead = Aead::new(&KEY).unwrap();

    let boxed = secret_box.encrypt(b"cross").unwrap();
    assert!(aead.decrypt(&boxed, b"").is_err());

    let sealed = aead.encrypt(b"cross", b"").unwrap();
    assert!(secret_box.decrypt(&sealed).is_err());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_shared_across_threads() {
    let aead = Arc::new(Aead::new(&KEY).unwrap());

    let handles: Vec<_> = (0..8u8)
        .map(|id| {
            let aead = Arc::clone(&aead);
            thread::spawn(move || {
                let aad = [id];
                (0..50u32)
                    .map(|n| {
                        let plaintext = format!("thread {id} message {n}");
                        let message = aead.encrypt(plaintext.as_bytes(), &aad).unwrap();
                        assert_eq!(aead.decrypt(&message, &aad).unwrap(), plaintext.as_bytes());
                        message.into_combined()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut nonces = std::collections::HashSet::new();
    for handle in handles {
        for combined in handle.join().unwrap() {
            assert!(nonces.insert(combined[..Aead::NONCE_SIZE].to_vec()));
        }
    }
    assert_eq!(nonces.len(), 400);
}

#[test]
fn test_secretbox_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SecretBox>();
    assert_send_sync::<Aead>();
}

// ============================================================================
// Persisted Messages
// ============================================================================

#[test]
fn test_message_survives_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("message.b64");

    let secret_box = SecretBox::new(&KEY).unwrap();
    let message = secret_box
        .encrypt_with(b"stored", None, &Base64Encoder)
        .unwrap();
    std::fs::write(&path, message.combined()).unwrap();

    let stored = std::fs::read(&path).unwrap();
    assert_eq!(
        secret_box.decrypt_with(&stored, None, &Base64Encoder).unwrap(),
        b"stored"
    );
}
