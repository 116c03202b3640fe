//! Fuzz target for combined-form parsing
//!
//! Feeds arbitrary bytes to decrypt under every encoding. Decoding,
//! splitting and size checks must fail cleanly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sealbox_crypto::{Aead, Encoding, SecretBox};

fuzz_target!(|data: &[u8]| {
    let (Ok(secret_box), Ok(aead)) = (SecretBox::new(&[0u8; 32]), Aead::new(&[0u8; 32])) else {
        return;
    };

    for encoding in Encoding::ALL {
        let _ = secret_box.decrypt_with(data, None, &encoding);
        let _ = aead.decrypt_with(data, b"", None, &encoding);
    }
});
