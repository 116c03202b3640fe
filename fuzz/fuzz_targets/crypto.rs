//! Fuzz target for cryptographic operations
//!
//! Tests that both constructs handle arbitrary keys, nonces and payloads
//! without panicking, and that every successful seal opens again.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sealbox_crypto::{Aead, SecretBox};

#[derive(Debug, Arbitrary)]
struct CryptoInput {
    key: Vec<u8>,
    nonce: Vec<u8>,
    plaintext: Vec<u8>,
    aad: Vec<u8>,
}

fuzz_target!(|input: CryptoInput| {
    // Arbitrary key and nonce lengths must be rejected, never panic
    if let Ok(secret_box) = SecretBox::new(&input.key) {
        if let Ok(message) = secret_box.encrypt_with_nonce(&input.plaintext, &input.nonce) {
            assert_eq!(secret_box.decrypt(&message).ok(), Some(input.plaintext.clone()));
        }
        let _ = secret_box.decrypt_with_nonce(&input.plaintext, &input.nonce);
    }

    if let Ok(aead) = Aead::new(&input.key) {
        if let Ok(message) = aead.encrypt_with_nonce(&input.plaintext, &input.aad, &input.nonce) {
            assert_eq!(
                aead.decrypt(&message, &input.aad).ok(),
                Some(input.plaintext.clone())
            );
        }
        let _ = aead.decrypt_with_nonce(&input.plaintext, &input.aad, &input.nonce);
    }
});
