//! Key storage and key input parsing.
//!
//! Keys are held in a fixed-size buffer that is zeroized on drop. Key input
//! arriving from configuration files is modelled by [`KeyMaterial`], which
//! is the only place a key can fail to be a byte buffer at all.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::CryptoError;
use crate::encoding::Encoder;
use crate::validate::key_array;

/// Fixed-size secret key. Zeroized on drop, redacted in `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct SecretKey<const N: usize>([u8; N]);

impl<const N: usize> SecretKey<N> {
    pub(crate) fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let mut array = key_array::<N>(bytes)?;
        let key = Self(array);
        array.zeroize();
        Ok(key)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> fmt::Debug for SecretKey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Key input as it appears in configuration.
///
/// Either encoded text (decoded with the caller's [`Encoder`]) or a list of
/// integers, each of which must be a byte value.
///
/// ```toml
/// key = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8="
/// # or
/// key = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
///        16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31]
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(untagged)]
pub enum KeyMaterial {
    /// Encoded key text
    Encoded(String),
    /// Raw byte values
    Integers(Vec<i64>),
}

impl KeyMaterial {
    /// Decode to raw key bytes.
    ///
    /// `expected` is the construct's key size and is only used to describe
    /// the failure; the length itself is checked by the construct. Encoded
    /// text is trimmed only for textual encoders, so raw keys keep every byte.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyType`] if any integer is outside
    /// `0..=255`, or [`CryptoError::Encoding`] if encoded text is malformed.
    pub fn decode<E: Encoder + ?Sized>(
        &self,
        encoder: &E,
        expected: usize,
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        match self {
            KeyMaterial::Encoded(text) => {
                let text = if encoder.is_textual() {
                    text.trim()
                } else {
                    text.as_str()
                };
                encoder.decode(text.as_bytes()).map(Zeroizing::new)
            }
            KeyMaterial::Integers(values) => {
                let mut bytes = Zeroizing::new(Vec::with_capacity(values.len()));
                for &value in values {
                    let byte =
                        u8::try_from(value).map_err(|_| CryptoError::InvalidKeyType { expected })?;
                    bytes.push(byte);
                }
                Ok(bytes)
            }
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::Encoded(_) => f.debug_tuple("Encoded").field(&"[REDACTED]").finish(),
            KeyMaterial::Integers(_) => f.debug_tuple("Integers").field(&"[REDACTED]").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{Base64Encoder, HexEncoder, RawEncoder};

    #[test]
    fn test_secret_key_rejects_wrong_length() {
        assert!(SecretKey::<32>::from_slice(&[1u8; 32]).is_ok());
        assert!(matches!(
            SecretKey::<32>::from_slice(&[1u8; 16]),
            Err(CryptoError::InvalidKeySize {
                expected: 32,
                actual: 16
            })
        ));
    }

    #[test]
    fn test_secret_key_debug_redacted() {
        let key = SecretKey::<32>::from_slice(&[0xAB; 32]).unwrap();
        let debug = format!("{key:?}");
        assert_eq!(debug, "[REDACTED]");
        assert!(!debug.contains("171"));
    }

    #[test]
    fn test_key_material_encoded() {
        let material = KeyMaterial::Encoded(format!("{}\n", "ab".repeat(32)));
        let bytes = material.decode(&HexEncoder, 32).unwrap();
        assert_eq!(bytes.as_slice(), &[0xAB; 32]);
    }

    #[test]
    fn test_key_material_raw_keeps_whitespace() {
        let text = format!(" {} \n", "k".repeat(29));
        let bytes = KeyMaterial::Encoded(text.clone())
            .decode(&RawEncoder, 32)
            .unwrap();
        assert_eq!(bytes.as_slice(), text.as_bytes());
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn test_key_material_integers() {
        let material = KeyMaterial::Integers((0..32).collect());
        let bytes = material.decode(&HexEncoder, 32).unwrap();
        assert_eq!(bytes[31], 31);
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn test_key_material_non_byte_integer() {
        let mut values: Vec<i64> = vec![0; 32];
        values[5] = 256;
        assert_eq!(
            KeyMaterial::Integers(values).decode(&HexEncoder, 32),
            Err(CryptoError::InvalidKeyType { expected: 32 })
        );
        assert_eq!(
            KeyMaterial::Integers(vec![-1]).decode(&HexEncoder, 32),
            Err(CryptoError::InvalidKeyType { expected: 32 })
        );
    }

    #[test]
    fn test_key_material_deserializes_both_forms() {
        let text: KeyMaterial = serde_json::from_str("\"AAEC\"").unwrap();
        assert_eq!(text.decode(&Base64Encoder, 32).unwrap().as_slice(), &[0, 1, 2]);

        let ints: KeyMaterial = serde_json::from_str("[1, 2, 300]").unwrap();
        assert!(matches!(ints, KeyMaterial::Integers(_)));
        assert!(ints.decode(&Base64Encoder, 32).is_err());
    }

    #[test]
    fn test_key_material_debug_redacted() {
        let material = KeyMaterial::Encoded("super-secret".into());
        assert!(!format!("{material:?}").contains("super-secret"));
    }
}
