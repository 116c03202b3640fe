//! Size checks shared by both constructs.
//!
//! Every fixed-size field is checked by exact length after decoding and
//! before any cryptographic operation. Nothing is truncated or padded.

use crate::CryptoError;
use crate::random::random_bytes;

/// Copy a key into a fixed array, rejecting any other length.
pub(crate) fn key_array<const N: usize>(key: &[u8]) -> Result<[u8; N], CryptoError> {
    <[u8; N]>::try_from(key).map_err(|_| CryptoError::InvalidKeySize {
        expected: N,
        actual: key.len(),
    })
}

pub(crate) fn check_nonce(nonce: &[u8], expected: usize) -> Result<(), CryptoError> {
    if nonce.len() != expected {
        return Err(CryptoError::InvalidNonceSize {
            expected,
            actual: nonce.len(),
        });
    }
    Ok(())
}

/// Use the caller's nonce, or draw a fresh one of `size` bytes.
pub(crate) fn resolve_nonce(nonce: Option<&[u8]>, size: usize) -> Result<Vec<u8>, CryptoError> {
    let nonce = match nonce {
        Some(nonce) => nonce.to_vec(),
        None => random_bytes(size)?,
    };
    check_nonce(&nonce, size)?;
    Ok(nonce)
}

/// Split a combined `nonce || ciphertext` buffer.
pub(crate) fn split_combined(
    combined: &[u8],
    nonce_size: usize,
) -> Result<(&[u8], &[u8]), CryptoError> {
    if combined.len() < nonce_size {
        return Err(CryptoError::InvalidNonceSize {
            expected: nonce_size,
            actual: combined.len(),
        });
    }
    Ok(combined.split_at(nonce_size))
}

pub(crate) fn check_ciphertext(ciphertext: &[u8], mac_size: usize) -> Result<(), CryptoError> {
    if ciphertext.len() < mac_size {
        return Err(CryptoError::CiphertextTooShort {
            minimum: mac_size,
            actual: ciphertext.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_message(plaintext: &[u8], max: u64) -> Result<(), CryptoError> {
    // usize -> u64 is lossless on every supported target
    if plaintext.len() as u64 > max {
        return Err(CryptoError::MessageTooLong { max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_array_exact_length_only() {
        assert!(key_array::<32>(&[7u8; 32]).is_ok());
        assert_eq!(
            key_array::<32>(&[7u8; 33]),
            Err(CryptoError::InvalidKeySize {
                expected: 32,
                actual: 33
            })
        );
        assert!(key_array::<32>(&[]).is_err());
    }

    #[test]
    fn test_resolve_nonce_generates_requested_size() {
        let nonce = resolve_nonce(None, 24).unwrap();
        assert_eq!(nonce.len(), 24);

        let explicit = [9u8; 24];
        assert_eq!(resolve_nonce(Some(&explicit), 24).unwrap(), explicit);

        assert_eq!(
            resolve_nonce(Some(&[0u8; 12]), 24),
            Err(CryptoError::InvalidNonceSize {
                expected: 24,
                actual: 12
            })
        );
    }

    #[test]
    fn test_split_combined_bounds() {
        let buf = [1u8; 30];
        let (nonce, rest) = split_combined(&buf, 24).unwrap();
        assert_eq!(nonce.len(), 24);
        assert_eq!(rest.len(), 6);

        let (nonce, rest) = split_combined(&buf[..24], 24).unwrap();
        assert_eq!(nonce.len(), 24);
        assert!(rest.is_empty());

        assert_eq!(
            split_combined(&buf[..23], 24),
            Err(CryptoError::InvalidNonceSize {
                expected: 24,
                actual: 23
            })
        );
    }

    #[test]
    fn test_check_ciphertext_minimum() {
        assert!(check_ciphertext(&[0u8; 16], 16).is_ok());
        assert_eq!(
            check_ciphertext(&[0u8; 15], 16),
            Err(CryptoError::CiphertextTooShort {
                minimum: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn test_check_message_limit() {
        assert!(check_message(&[0u8; 8], 8).is_ok());
        assert_eq!(
            check_message(&[0u8; 9], 8),
            Err(CryptoError::MessageTooLong { max: 8 })
        );
    }
}
