//! Encryption results.
//!
//! ## Wire Format
//!
//! ```text
//! +----------------+------------------------------------+
//! | Nonce (24B)    | Ciphertext (plaintext + 16B tag)   |
//! +----------------+------------------------------------+
//! ```
//!
//! The combined form has no length prefix and no separator: whoever parses
//! it must know the nonce size of the construct that produced it.

use std::ops::Deref;

use crate::encoding::Encoder;

/// The output of an encryption: nonce, ciphertext and combined form.
///
/// Each view is encoded independently with the encoder chosen at encryption
/// time. Before encoding, `combined == nonce || ciphertext`.
///
/// Dereferences to the combined form, which is what most callers store or
/// send.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncryptedMessage {
    nonce: Vec<u8>,
    ciphertext: Vec<u8>,
    combined: Vec<u8>,
}

impl EncryptedMessage {
    pub(crate) fn from_parts<E: Encoder + ?Sized>(
        nonce: &[u8],
        ciphertext: &[u8],
        encoder: &E,
    ) -> Self {
        let mut combined = Vec::with_capacity(nonce.len() + ciphertext.len());
        combined.extend_from_slice(nonce);
        combined.extend_from_slice(ciphertext);

        Self {
            nonce: encoder.encode(nonce),
            ciphertext: encoder.encode(ciphertext),
            combined: encoder.encode(&combined),
        }
    }

    /// The encoded nonce.
    #[must_use]
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// The encoded ciphertext, tag included.
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// The encoded `nonce || ciphertext`.
    #[must_use]
    pub fn combined(&self) -> &[u8] {
        &self.combined
    }

    /// Consume the message, keeping only the combined form.
    #[must_use]
    pub fn into_combined(self) -> Vec<u8> {
        self.combined
    }
}

impl Deref for EncryptedMessage {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.combined
    }
}

impl AsRef<[u8]> for EncryptedMessage {
    fn as_ref(&self) -> &[u8] {
        &self.combined
    }
}

impl From<EncryptedMessage> for Vec<u8> {
    fn from(message: EncryptedMessage) -> Self {
        message.into_combined()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{HexEncoder, RawEncoder};

    #[test]
    fn test_combined_is_concatenation() {
        let message = EncryptedMessage::from_parts(&[1, 2, 3], &[4, 5], &RawEncoder);
        assert_eq!(message.nonce(), &[1, 2, 3]);
        assert_eq!(message.ciphertext(), &[4, 5]);
        assert_eq!(message.combined(), &[1, 2, 3, 4, 5]);
        assert_eq!(&*message, &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_views_encoded_independently() {
        let message = EncryptedMessage::from_parts(&[0xAA], &[0xBB, 0xCC], &HexEncoder);
        assert_eq!(message.nonce(), b"aa");
        assert_eq!(message.ciphertext(), b"bbcc");
        assert_eq!(message.combined(), b"aabbcc");
        assert_eq!(Vec::from(message), b"aabbcc".to_vec());
    }
}
