//! # sealbox crypto
//!
//! Misuse-resistant authenticated encryption.
//!
//! This crate provides:
//! - [`SecretBox`]: confidentiality and integrity, no associated data
//! - [`Aead`]: confidentiality and integrity with additional authenticated data
//! - Strict key and nonce size validation, failing closed on malformed input
//! - Random nonce generation from the OS CSPRNG
//! - A fixed `nonce || ciphertext` combined wire layout
//! - Pluggable text encodings (raw, hex, base16, base64, URL-safe base64)
//!
//! ## Cryptographic Suite
//!
//! | Construct | Algorithm | Key | Nonce | Tag |
//! |-----------|-----------|-----|-------|-----|
//! | `SecretBox` | XSalsa20-Poly1305 | 32 | 24 | 16 |
//! | `Aead` | XChaCha20-Poly1305 (IETF) | 32 | 24 | 16 |
//!
//! ## Nonces
//!
//! A nonce must never be reused with the same key for two different
//! plaintexts. Omitting the nonce draws a fresh 192-bit value from the OS
//! CSPRNG, which makes accidental collisions negligible. Callers supplying
//! their own nonces own the uniqueness obligation.
//!
//! ## Usage
//!
//! ```rust
//! use sealbox_crypto::{Aead, SecretBox};
//!
//! let secret_box = SecretBox::generate().expect("rng");
//! let message = secret_box.encrypt(b"attack at dawn").expect("encrypt");
//! let plaintext = secret_box.decrypt(message.combined()).expect("decrypt");
//! assert_eq!(plaintext, b"attack at dawn");
//!
//! let aead = Aead::generate().expect("rng");
//! let message = aead.encrypt(b"payload", b"header").expect("encrypt");
//! assert!(aead.decrypt(message.combined(), b"").is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod aead;
pub mod encoding;
pub mod error;
pub mod key;
pub mod message;
pub mod random;
pub mod secret;
mod validate;

pub use aead::Aead;
pub use encoding::{
    Base16Encoder, Base64Encoder, Encoder, Encoding, HexEncoder, RawEncoder, UrlSafeBase64Encoder,
};
pub use error::CryptoError;
pub use key::KeyMaterial;
pub use message::EncryptedMessage;
pub use secret::SecretBox;
