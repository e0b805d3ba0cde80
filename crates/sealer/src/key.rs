//! [`KeyMaterial`]: the fixed-size secret every seal/open call runs under.
//!
//! # Security invariants
//!
//! - The raw key is never logged, printed, or returned to callers.
//! - [`KeyMaterial::info`] exposes only a prefix of a SHA-256 digest.
//! - The buffer is zeroed when the value is dropped.

use common::KeyInfo;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

use crate::codec;
use crate::error::CryptoError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Identifier reported for the cipher and mode in use.
pub const ALGORITHM: &str = "AES-256-GCM";

/// Number of hex characters of the key digest shown by [`KeyMaterial::info`].
const KEY_HASH_PREFIX_LEN: usize = 8;

/// Exactly [`KEY_LEN`] bytes of secret key material.
///
/// Immutable once built. Share it across threads behind an `Arc`.
pub struct KeyMaterial(Box<[u8; KEY_LEN]>);

impl KeyMaterial {
    /// Copy `bytes` into a new key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyInit`] if `bytes` is not [`KEY_LEN`] long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_LEN {
            return Err(CryptoError::key_len(bytes.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Decode a standard-base64 key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encoding`] for invalid base64 and
    /// [`CryptoError::KeyInit`] if the decoded length is wrong.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = Zeroizing::new(codec::decode(encoded.trim())?);
        Self::from_slice(&bytes)
    }

    /// Raw key bytes, for cipher initialisation only.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Non-reversing description of this key.
    pub fn info(&self) -> KeyInfo {
        let digest = hex::encode(Sha256::digest(&self.0[..]));
        KeyInfo {
            key_hash: format!("{}...", &digest[..KEY_HASH_PREFIX_LEN]),
            key_size: KEY_LEN,
            algorithm: ALGORITHM.to_owned(),
        }
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_length() {
        let key = KeyMaterial::from_slice(&[0x42u8; KEY_LEN]).unwrap();
        assert_eq!(key.as_bytes(), &[0x42u8; KEY_LEN]);
    }

    #[test]
    fn rejects_short_and_long_keys() {
        assert!(matches!(
            KeyMaterial::from_slice(&[0u8; 16]),
            Err(CryptoError::KeyInit { got: 16, .. })
        ));
        assert!(matches!(
            KeyMaterial::from_slice(&[0u8; 33]),
            Err(CryptoError::KeyInit { got: 33, .. })
        ));
        assert!(KeyMaterial::from_slice(&[]).is_err());
    }

    #[test]
    fn from_base64_round_trips_through_codec() {
        let raw = [7u8; KEY_LEN];
        let key = KeyMaterial::from_base64(&codec::encode(raw)).unwrap();
        assert_eq!(key.as_bytes(), &raw);
    }

    #[test]
    fn from_base64_rejects_bad_input() {
        assert!(matches!(
            KeyMaterial::from_base64("!!not base64!!"),
            Err(CryptoError::Encoding(_))
        ));
        assert!(matches!(
            KeyMaterial::from_base64(&codec::encode([1u8; 8])),
            Err(CryptoError::KeyInit { got: 8, .. })
        ));
    }

    #[test]
    fn info_reports_digest_prefix_not_key() {
        // The legacy peers use this ASCII key; its hex form starts "31323334".
        let key = KeyMaterial::from_slice(b"12345678901234567890123456789012").unwrap();
        let info = key.info();
        assert_eq!(info.key_size, KEY_LEN);
        assert_eq!(info.algorithm, "AES-256-GCM");
        assert_eq!(info.key_hash.len(), KEY_HASH_PREFIX_LEN + 3);
        assert!(info.key_hash.ends_with("..."));
        assert!(!info.key_hash.starts_with("31323334"));

        let expected = hex::encode(Sha256::digest(b"12345678901234567890123456789012"));
        assert!(info.key_hash.starts_with(&expected[..KEY_HASH_PREFIX_LEN]));
    }

    #[test]
    fn zeroize_clears_key_buffer() {
        let mut key = KeyMaterial::from_slice(&[0xA5u8; KEY_LEN]).unwrap();
        key.0.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; KEY_LEN]);
    }

    #[test]
    fn debug_is_redacted() {
        let key = KeyMaterial::from_slice(&[0xFFu8; KEY_LEN]).unwrap();
        let shown = format!("{key:?}");
        assert!(shown.contains("REDACTED"));
        assert!(!shown.contains("255"));
    }
}
