//! Transport encoding for sealed messages: standard base64 with padding.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::CryptoError;

/// Encode bytes as standard, padded base64.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard, padded base64.
///
/// # Errors
///
/// Returns [`CryptoError::Encoding`] on invalid characters, bad padding, or a
/// truncated final quantum.
pub fn decode(text: &str) -> Result<Vec<u8>, CryptoError> {
    Ok(STANDARD.decode(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_padded_standard_alphabet() {
        assert_eq!(encode(b"hi"), "aGk=");
        assert_eq!(encode([0xfbu8, 0xff]), "+/8=");
        assert_eq!(encode(b""), "");
    }

    #[test]
    fn decode_inverts_encode() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(matches!(
            decode("not-valid-base64!!"),
            Err(CryptoError::Encoding(_))
        ));
    }

    #[test]
    fn rejects_bad_padding() {
        assert!(decode("aGk").is_err());
        assert!(decode("aGk==").is_err());
    }

    #[test]
    fn rejects_url_safe_alphabet() {
        assert!(decode("-_8=").is_err());
    }
}
