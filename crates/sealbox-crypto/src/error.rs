//! Cryptographic error types.

use thiserror::Error;

/// Cryptographic errors
///
/// Every variant fails closed: no operation returning an error has produced
/// partial output. [`CryptoError::AuthenticationFailure`] is deliberately
/// detail-free so that callers cannot learn why verification failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key input did not decode to a byte buffer
    #[error("key must be created from {expected} bytes")]
    InvalidKeyType {
        /// Required key size
        expected: usize,
    },

    /// Invalid key length
    #[error("the key must be exactly {expected} bytes long, got {actual}")]
    InvalidKeySize {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Invalid nonce length
    #[error("the nonce must be exactly {expected} bytes long, got {actual}")]
    InvalidNonceSize {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Ciphertext cannot hold an authentication tag
    #[error("ciphertext too short: {actual} bytes (minimum {minimum})")]
    CiphertextTooShort {
        /// Minimum length (the tag size)
        minimum: usize,
        /// Actual length
        actual: usize,
    },

    /// Plaintext exceeds the construct's per-message limit
    #[error("message too long: maximum is {max} bytes")]
    MessageTooLong {
        /// Maximum message size
        max: u64,
    },

    /// Decryption failed (authentication failure)
    #[error("decryption failed: ciphertext failed verification")]
    AuthenticationFailure,

    /// Encryption failed
    #[error("encryption failed")]
    EncryptionFailed,

    /// Encoded input could not be decoded
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Random number generation failed
    #[error("random number generation failed")]
    RandomFailed,
}

impl CryptoError {
    /// Whether this error means the input was forged or tampered with, as
    /// opposed to malformed.
    #[must_use]
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_errors_name_expected_size() {
        let err = CryptoError::InvalidKeySize {
            expected: 32,
            actual: 31,
        };
        assert_eq!(
            err.to_string(),
            "the key must be exactly 32 bytes long, got 31"
        );

        let err = CryptoError::InvalidNonceSize {
            expected: 24,
            actual: 0,
        };
        assert!(err.to_string().contains("24 bytes"));
    }

    #[test]
    fn test_authentication_failure_is_distinct() {
        assert!(CryptoError::AuthenticationFailure.is_authentication_failure());
        assert!(
            !CryptoError::CiphertextTooShort {
                minimum: 16,
                actual: 3
            }
            .is_authentication_failure()
        );
        assert!(!CryptoError::Encoding("bad".into()).is_authentication_failure());
    }
}
