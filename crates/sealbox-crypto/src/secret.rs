//! `XSalsa20-Poly1305` secret box.
//!
//! Authenticated encryption without associated data, compatible with NaCl's
//! `crypto_secretbox`. Ciphertexts carry a 16-byte Poly1305 authenticator;
//! an invalid authenticator makes decryption fail with
//! [`CryptoError::AuthenticationFailure`].
//!
//! The authenticator is not a signature. Anyone able to decrypt can also
//! forge messages, so messages are repudiable. Sign after encrypting if
//! non-repudiation is needed.
//!
//! ## Usage
//!
//! ```rust
//! use sealbox_crypto::{HexEncoder, SecretBox};
//!
//! let secret_box = SecretBox::new(&[0u8; SecretBox::KEY_SIZE]).unwrap();
//!
//! // Random nonce, raw bytes
//! let message = secret_box.encrypt(b"hello").unwrap();
//! assert_eq!(secret_box.decrypt(&message).unwrap(), b"hello");
//!
//! // Hex-encoded output
//! let message = secret_box.encrypt_with(b"hello", None, &HexEncoder).unwrap();
//! let plaintext = secret_box
//!     .decrypt_with(message.combined(), None, &HexEncoder)
//!     .unwrap();
//! assert_eq!(plaintext, b"hello");
//! ```

use std::fmt;

use crypto_secretbox::XSalsa20Poly1305;
use crypto_secretbox::aead::generic_array::typenum::Unsigned;
use crypto_secretbox::aead::{self, Aead as _, AeadCore, KeyInit, KeySizeUser};
use zeroize::Zeroizing;

use crate::encoding::{Encoder, RawEncoder};
use crate::key::{KeyMaterial, SecretKey};
use crate::message::EncryptedMessage;
use crate::validate;
use crate::{CryptoError, random};

const KEY_SIZE: usize = <XSalsa20Poly1305 as KeySizeUser>::KeySize::USIZE;
const NONCE_SIZE: usize = <XSalsa20Poly1305 as AeadCore>::NonceSize::USIZE;
const MACBYTES: usize = <XSalsa20Poly1305 as AeadCore>::TagSize::USIZE;

/// Secret box holding one validated key.
///
/// Stateless apart from the key, so a single instance can be shared across
/// threads (e.g. behind an `Arc`). The key is zeroized on drop.
#[derive(Clone)]
pub struct SecretBox {
    key: SecretKey<KEY_SIZE>,
}

impl SecretBox {
    /// Required key size (32 bytes).
    pub const KEY_SIZE: usize = KEY_SIZE;
    /// Required nonce size (24 bytes).
    pub const NONCE_SIZE: usize = NONCE_SIZE;
    /// Authentication tag size (16 bytes).
    pub const MACBYTES: usize = MACBYTES;
    /// Largest plaintext that can be sealed under one key/nonce pair.
    pub const MESSAGEBYTES_MAX: u64 = u64::MAX - MACBYTES as u64;

    /// Create a secret box from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeySize`] if `key` is not 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            key: SecretKey::from_slice(key)?,
        })
    }

    /// Create a secret box from an encoded key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encoding`] if the key cannot be decoded and
    /// [`CryptoError::InvalidKeySize`] if the decoded key is not 32 bytes.
    pub fn from_encoded<E: Encoder + ?Sized>(key: &[u8], encoder: &E) -> Result<Self, CryptoError> {
        let key = Zeroizing::new(encoder.decode(key)?);
        Self::new(&key)
    }

    /// Create a secret box from configuration key material.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyType`] if the material is not a byte
    /// buffer, plus the errors of [`SecretBox::from_encoded`].
    pub fn from_key_material<E: Encoder + ?Sized>(
        material: &KeyMaterial,
        encoder: &E,
    ) -> Result<Self, CryptoError> {
        let key = material.decode(encoder, KEY_SIZE)?;
        Self::new(&key)
    }

    /// Create a secret box around a fresh random key.
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
    /// See [`SecretBox::encrypt_with`].
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedMessage, CryptoError> {
        self.encrypt_with(plaintext, None, &RawEncoder)
    }

    /// Encrypt under an explicit nonce, returning raw bytes.
    ///
    /// The nonce must never be reused with this key for a different
    /// plaintext. Give each sender its own prefix, or use disjoint counters.
    ///
    /// # Errors
    ///
    /// See [`SecretBox::encrypt_with`].
    pub fn encrypt_with_nonce(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
    ) -> Result<EncryptedMessage, CryptoError> {
        self.encrypt_with(plaintext, Some(nonce), &RawEncoder)
    }

    /// Encrypt `plaintext`, generating a random nonce when `nonce` is `None`.
    ///
    /// Nonce, ciphertext and combined form are each encoded with `encoder`.
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
        nonce: Option<&[u8]>,
        encoder: &E,
    ) -> Result<EncryptedMessage, CryptoError> {
        tracing::trace!(
            construct = "secretbox",
            plaintext_len = plaintext.len(),
            random_nonce = nonce.is_none(),
            "encrypt"
        );

        let nonce = validate::resolve_nonce(nonce, NONCE_SIZE)?;
        validate::check_message(plaintext, Self::MESSAGEBYTES_MAX)?;

        let ciphertext = self
            .cipher()
            .encrypt(aead::Nonce::<XSalsa20Poly1305>::from_slice(&nonce), plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        Ok(EncryptedMessage::from_parts(&nonce, &ciphertext, encoder))
    }

    /// Decrypt a raw combined `nonce || ciphertext` buffer.
    ///
    /// # Errors
    ///
    /// See [`SecretBox::decrypt_with`].
    pub fn decrypt(&self, combined: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.decrypt_with(combined, None, &RawEncoder)
    }

    /// Decrypt a raw ciphertext with an explicit nonce.
    ///
    /// # Errors
    ///
    /// See [`SecretBox::decrypt_with`].
    pub fn decrypt_with_nonce(&self, ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.decrypt_with(ciphertext, Some(nonce), &RawEncoder)
    }

    /// Decrypt `ciphertext` after decoding it with `encoder`.
    ///
    /// When `nonce` is `None` the decoded bytes are taken to be the combined
    /// form and the first 24 bytes are used as the nonce. An explicit nonce
    /// is raw bytes and is not decoded.
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
            construct = "secretbox",
            ciphertext_len = ciphertext.len(),
            "decrypt"
        );

        self.cipher()
            .decrypt(aead::Nonce::<XSalsa20Poly1305>::from_slice(nonce), ciphertext)
            .map_err(|_| {
                tracing::debug!(construct = "secretbox", "authentication failed");
                CryptoError::AuthenticationFailure
            })
    }

    fn cipher(&self) -> XSalsa20Poly1305 {
        XSalsa20Poly1305::new(self.key.as_bytes().into())
    }
}

impl fmt::Debug for SecretBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBox")
            .field("key", &self.key)
            .finish()
    }
}
