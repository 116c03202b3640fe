//! `XChaCha20-Poly1305` AEAD encryption.
//!
//! Unlike [`SecretBox`](crate::SecretBox), an [`Aead`] also authenticates
//! non-confidential data travelling alongside the message, such as a length
//! or type tag. Features include:
//! - 256-bit keys
//! - 192-bit nonces (extended nonce for safe random generation)
//! - 128-bit authentication tags
//! - Associated data authentication
//!
//! ## Security Properties
//!
//! - Confidentiality: `XChaCha20` stream cipher
//! - Integrity: Poly1305 MAC with 128-bit security
//! - Nonce misuse: 192-bit nonce makes random collisions negligible
//!
//! Keep the default random nonces where possible. If they do not fit, the
//! next best option is split counters, e.g. each of two peers counting its
//! own messages with a one-bit sender id. A counter must never roll back
//! (overflow, restored backups, ...).
//!
//! The associated data must be supplied identically to `encrypt` and the
//! matching `decrypt`; any difference, including length, fails
//! authentication.
//!
//! ## Usage
//!
//! ```rust
//! use sealbox_crypto::{Aead, CryptoError};
//!
//! let aead = Aead::new(&[0u8; Aead::KEY_SIZE]).unwrap();
//!
//! let message = aead.encrypt(b"secret", b"header").unwrap();
//! assert_eq!(aead.decrypt(&message, b"header").unwrap(), b"secret");
//! assert_eq!(
//!     aead.decrypt(&message, b""),
//!     Err(CryptoError::AuthenticationFailure)
//! );
//! ```

use std::fmt;

use chacha20poly1305::aead::generic_array::typenum::Unsigned;
use chacha20poly1305::aead::{Aead as _, AeadCore, KeyInit, KeySizeUser, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use zeroize::Zeroizing;

use crate::encoding::{Encoder, RawEncoder};
use crate::key::{KeyMaterial, SecretKey};
use crate::message::EncryptedMessage;
use crate::validate;
use crate::{CryptoError, random};

const KEY_SIZE: usize = <XChaCha20Poly1305 as KeySizeUser>::KeySize::USIZE;
const NONCE_SIZE: usize = <XChaCha20Poly1305 as AeadCore>::NonceSize::USIZE;
const MACBYTES: usize = <XChaCha20Poly1305 as AeadCore>::TagSize::USIZE;

/// AEAD construct holding one validated key.
///
/// Stateless apart from the key, so a single instance can be shared across
/// threads. The key is zeroized on drop.
#[derive(Clone)]
pub struct Aead {
    key: SecretKey<KEY_SIZE>,
}

impl Aead {
    /// Required key size (32 bytes).
    pub const KEY_SIZE: usize = KEY_SIZE;
    /// Required nonce size (24 bytes).
    pub const NONCE_SIZE: usize = NONCE_SIZE;
    /// Authentication tag size (16 bytes).
    pub const MACBYTES: usize = MACBYTES;
    /// Largest plaintext that can be sealed under one key/nonce pair: the
    /// 32-bit IETF `ChaCha20` block counter allows `2^32 - 1` blocks.
    pub const MESSAGEBYTES_MAX: u64 = u32::MAX as u64 * 64;

    /// Create an AEAD from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeySize`] if `key` is not 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            key: SecretKey::from_slice(key)?,
        })
    }

    /// Create an AEAD from an encoded key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encoding`] if the key cannot be decoded and
    /// [`CryptoError::InvalidKeySize`] if the decoded key is not 32 bytes.
    pub fn from_encoded<E: Encoder + ?Sized>(key: &[u8], encoder: &E) -> Result<Self, CryptoError> {
        let key = Zeroizing::new(encoder.decode(key)?);
        Self::new(&key)
    }

    /// Create an AEAD from configuration key material.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyType`] if the material is not a byte
    /// buffer, plus the errors of [`Aead::from_encoded`].
    pub fn from_key_material<E: Encoder + ?Sized>(
        material: &KeyMaterial,
        encoder: &E,
    ) -> Result<Self, CryptoError> {
        let key = material.decode(encoder, KEY_SIZE)?;
        Self::new(&key)
    }

    /// Create an AEAD around a fresh random key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS CSPRNG fails.
    pub fn generate() -> Result<Self, CryptoError> {
        let key = Zeroizing::new(random::random_array::<KEY_SIZE>()?);
        Self::new(key.as_slice())
    }

    /// Raw key bytes.
    ///
    /// # Security
    ///
    /// Handle with extreme care - this exposes the raw key material.
    #[must_use]
    pub fn key_bytes(&self) -> &[u8; KEY_SIZE] {
        self.key.as_bytes()
    }

    /// The key in the given encoding, for transport or storage.
    #[must_use]
    pub fn encode_key<E: Encoder + ?Sized>(&self, encoder: &E) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(encoder.encode(self.key.as_bytes()))
    }

    /// Encrypt under a fresh random nonce, returning raw bytes.
    ///
    /// # Errors
    ///
    /// See [`Aead::encrypt_with`].
    pub fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> Result<EncryptedMessage, CryptoError> {
        self.encrypt_with(plaintext, aad, None, &RawEncoder)
    }

    /// Encrypt under an explicit nonce, returning raw bytes.
    ///
    /// # Errors
    ///
    /// See [`Aead::encrypt_with`].
    pub fn encrypt_with_nonce(
        &self,
        plaintext: &[u8],
        aad: &[u8],
        nonce: &[u8],
    ) -> Result<EncryptedMessage, CryptoError> {
        self.encrypt_with(plaintext, aad, Some(nonce), &RawEncoder)
    }

    /// Encrypt `plaintext` and authenticate `aad`, generating a random nonce
    /// when `nonce` is `None`.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::InvalidNonceSize`] if `nonce` is not 24 bytes
    /// - [`CryptoError::MessageTooLong`] if `plaintext` exceeds [`Self::MESSAGEBYTES_MAX`]
    /// - [`CryptoError::RandomFailed`] if nonce generation fails
    /// - [`CryptoError::EncryptionFailed`] if the cipher refuses the input
    pub fn encrypt_with<E: Encoder + ?Sized>(
        &self,
        plaintext: &[u8],
        aad: &[u8],
        nonce: Option<&[u8]>,
        encoder: &E,
    ) -> Result<EncryptedMessage, CryptoError> {
        tracing::trace!(
            construct = "aead",
            plaintext_len = plaintext.len(),
            aad_len = aad.len(),
            random_nonce = nonce.is_none(),
            "encrypt"
        );

        let nonce = validate::resolve_nonce(nonce, NONCE_SIZE)?;
        validate::check_message(plaintext, Self::MESSAGEBYTES_MAX)?;

        let ciphertext = self
            .cipher()
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::EncryptionFailed)?;

        Ok(EncryptedMessage::from_parts(&nonce, &ciphertext, encoder))
    }

    /// Decrypt a raw combined `nonce || ciphertext` buffer.
    ///
    /// # Errors
    ///
    /// See [`Aead::decrypt_with`].
    pub fn decrypt(&self, combined: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.decrypt_with(combined, aad, None, &RawEncoder)
    }

    /// Decrypt a raw ciphertext with an explicit nonce.
    ///
    /// # Errors
    ///
    /// See [`Aead::decrypt_with`].
    pub fn decrypt_with_nonce(
        &self,
        ciphertext: &[u8],
        aad: &[u8],
        nonce: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.decrypt_with(ciphertext, aad, Some(nonce), &RawEncoder)
    }

    /// Decrypt `ciphertext` after decoding it with `encoder`, verifying
    /// `aad`.
    ///
    /// When `nonce` is `None` the decoded bytes are taken to be the combined
    /// form and the first 24 bytes are used as the nonce.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::Encoding`] if `ciphertext` cannot be decoded
    /// - [`CryptoError::InvalidNonceSize`] if the nonce is not 24 bytes
    /// - [`CryptoError::CiphertextTooShort`] if no full tag is present
    /// - [`CryptoError::AuthenticationFailure`] if the tag does not verify
    pub fn decrypt_with<E: Encoder + ?Sized>(
        &self,
        ciphertext: &[u8],
        aad: &[u8],
        nonce: Option<&[u8]>,
        encoder: &E,
    ) -> Result<Vec<u8>, CryptoError> {
        let decoded = encoder.decode(ciphertext)?;

        let (nonce, ciphertext) = match nonce {
            Some(nonce) => (nonce, decoded.as_slice()),
            None => validate::split_combined(&decoded, NONCE_SIZE)?,
        };
        validate::check_nonce(nonce, NONCE_SIZE)?;
        validate::check_ciphertext(ciphertext, MACBYTES)?;

        tracing::trace!(
            construct = "aead",
            ciphertext_len = ciphertext.len(),
            aad_len = aad.len(),
            "decrypt"
        );

        self.cipher()
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad,
                },
            )
            .map_err(|_| {
                tracing::debug!(construct = "aead", "authentication failed");
                CryptoError::AuthenticationFailure
            })
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(self.key.as_bytes().into())
    }
}

impl fmt::Debug for Aead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aead").field("key", &self.key).finish()
    }
}
