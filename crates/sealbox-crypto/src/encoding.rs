//! Pluggable encodings for keys, nonces and ciphertexts.
//!
//! An [`Encoder`] is a pure, invertible transform over byte buffers. The
//! same encoder that produced a value must be used to decode it before the
//! raw bytes are used again. Encoders are selected either statically (the
//! zero-sized types below) or at runtime through [`Encoding`], which also
//! works as a trait object.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use serde::{Deserialize, Serialize};

use crate::CryptoError;

/// Encode and decode byte buffers.
///
/// `decode(encode(x)) == x` must hold for every `x`.
pub trait Encoder {
    /// Encode raw bytes.
    fn encode(&self, data: &[u8]) -> Vec<u8>;

    /// Decode an encoded representation back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encoding`] if `data` is not a valid encoding.
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Whether encoded output is printable text. Surrounding ASCII
    /// whitespace is never part of a textual encoding and may be trimmed.
    fn is_textual(&self) -> bool {
        true
    }
}

/// Identity encoding. The default everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawEncoder;

impl Encoder for RawEncoder {
    fn encode(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(data.to_vec())
    }

    fn is_textual(&self) -> bool {
        false
    }
}

/// Lowercase hexadecimal. Decoding accepts either case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexEncoder;

impl Encoder for HexEncoder {
    fn encode(&self, data: &[u8]) -> Vec<u8> {
        hex::encode(data).into_bytes()
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        hex::decode(data).map_err(|e| CryptoError::Encoding(format!("hex: {e}")))
    }
}

/// RFC 4648 base16: uppercase hexadecimal, strict on decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base16Encoder;

impl Encoder for Base16Encoder {
    fn encode(&self, data: &[u8]) -> Vec<u8> {
        hex::encode_upper(data).into_bytes()
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if data.iter().any(u8::is_ascii_lowercase) {
            return Err(CryptoError::Encoding(
                "base16: lowercase digits are not allowed".into(),
            ));
        }
        hex::decode(data).map_err(|e| CryptoError::Encoding(format!("base16: {e}")))
    }
}

/// RFC 4648 base64, standard alphabet, padded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base64Encoder;

impl Encoder for Base64Encoder {
    fn encode(&self, data: &[u8]) -> Vec<u8> {
        STANDARD.encode(data).into_bytes()
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        STANDARD
            .decode(data)
            .map_err(|e| CryptoError::Encoding(format!("base64: {e}")))
    }
}

/// RFC 4648 base64, URL-safe alphabet, padded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlSafeBase64Encoder;

impl Encoder for UrlSafeBase64Encoder {
    fn encode(&self, data: &[u8]) -> Vec<u8> {
        URL_SAFE.encode(data).into_bytes()
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        URL_SAFE
            .decode(data)
            .map_err(|e| CryptoError::Encoding(format!("urlsafe-base64: {e}")))
    }
}

/// Runtime-selectable encoding.
///
/// Parses from and serializes to its kebab-case name, so it can be read
/// from configuration files and command-line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// Raw bytes
    #[default]
    Raw,
    /// Lowercase hex
    Hex,
    /// Uppercase hex
    Base16,
    /// Standard base64
    Base64,
    /// URL-safe base64
    #[serde(rename = "urlsafe-base64")]
    UrlSafeBase64,
}

impl Encoding {
    /// Every supported encoding.
    pub const ALL: [Encoding; 5] = [
        Encoding::Raw,
        Encoding::Hex,
        Encoding::Base16,
        Encoding::Base64,
        Encoding::UrlSafeBase64,
    ];

    /// Canonical name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Raw => "raw",
            Encoding::Hex => "hex",
            Encoding::Base16 => "base16",
            Encoding::Base64 => "base64",
            Encoding::UrlSafeBase64 => "urlsafe-base64",
        }
    }

    fn encoder(self) -> &'static dyn Encoder {
        match self {
            Encoding::Raw => &RawEncoder,
            Encoding::Hex => &HexEncoder,
            Encoding::Base16 => &Base16Encoder,
            Encoding::Base64 => &Base64Encoder,
            Encoding::UrlSafeBase64 => &UrlSafeBase64Encoder,
        }
    }
}

impl Encoder for Encoding {
    fn encode(&self, data: &[u8]) -> Vec<u8> {
        self.encoder().encode(data)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.encoder().decode(data)
    }

    fn is_textual(&self) -> bool {
        self.encoder().is_textual()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(Encoding::Raw),
            "hex" => Ok(Encoding::Hex),
            "base16" => Ok(Encoding::Base16),
            "base64" => Ok(Encoding::Base64),
            "urlsafe-base64" | "base64url" => Ok(Encoding::UrlSafeBase64),
            other => Err(CryptoError::Encoding(format!(
                "unknown encoding '{other}' (expected one of: raw, hex, base16, base64, urlsafe-base64)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = &[0x00, 0xfb, 0xff, 0x10, 0x7e];

    #[test]
    fn test_known_encodings() {
        assert_eq!(HexEncoder.encode(SAMPLE), b"00fbff107e");
        assert_eq!(Base16Encoder.encode(SAMPLE), b"00FBFF107E");
        assert_eq!(Base64Encoder.encode(SAMPLE), b"APv/EH4=");
        assert_eq!(UrlSafeBase64Encoder.encode(SAMPLE), b"APv_EH4=");
        assert_eq!(RawEncoder.encode(SAMPLE), SAMPLE);
    }

    #[test]
    fn test_every_encoding_inverts() {
        for encoding in Encoding::ALL {
            let encoded = encoding.encode(SAMPLE);
            assert_eq!(encoding.decode(&encoded).unwrap(), SAMPLE, "{encoding}");
        }
    }

    #[test]
    fn test_hex_accepts_uppercase_base16_rejects_lowercase() {
        assert_eq!(HexEncoder.decode(b"00FBFF107E").unwrap(), SAMPLE);
        assert!(matches!(
            Base16Encoder.decode(b"00fbff107e"),
            Err(CryptoError::Encoding(_))
        ));
    }

    #[test]
    fn test_malformed_input_is_encoding_error() {
        assert!(matches!(
            HexEncoder.decode(b"abc"),
            Err(CryptoError::Encoding(_))
        ));
        assert!(matches!(
            Base64Encoder.decode(b"not base64!"),
            Err(CryptoError::Encoding(_))
        ));
        // Standard and URL-safe alphabets are not interchangeable
        assert!(Base64Encoder.decode(b"APv_EH4=").is_err());
        assert!(UrlSafeBase64Encoder.decode(b"APv/EH4=").is_err());
    }

    #[test]
    fn test_encoding_names_round_trip() {
        for encoding in Encoding::ALL {
            assert_eq!(encoding.name().parse::<Encoding>().unwrap(), encoding);
        }
        assert_eq!("BASE64".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert_eq!(
            "base64url".parse::<Encoding>().unwrap(),
            Encoding::UrlSafeBase64
        );
        assert!("base32".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_encoding_serde_names() {
        let json = serde_json::to_string(&Encoding::UrlSafeBase64).unwrap();
        assert_eq!(json, "\"urlsafe-base64\"");
        let parsed: Encoding = serde_json::from_str("\"base16\"").unwrap();
        assert_eq!(parsed, Encoding::Base16);
    }

    #[test]
    fn test_encoding_as_trait_object() {
        let encoders: [&dyn Encoder; 2] = [&HexEncoder, &Encoding::Base64];
        for encoder in encoders {
            assert_eq!(encoder.decode(&encoder.encode(SAMPLE)).unwrap(), SAMPLE);
        }
    }

    #[test]
    fn test_only_raw_is_binary() {
        assert!(!RawEncoder.is_textual());
        assert!(HexEncoder.is_textual());
        assert!(UrlSafeBase64Encoder.is_textual());
        for encoding in Encoding::ALL {
            assert_eq!(encoding.is_textual(), encoding != Encoding::Raw, "{encoding}");
        }
    }
}
