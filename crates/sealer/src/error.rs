//! Error taxonomy for the sealing core.

use common::ServiceError;
use thiserror::Error;

use crate::key::KEY_LEN;

/// Errors produced by the key, cipher, and codec layers.
///
/// The `Display` text is for logs and tests. Callers outside the process see
/// [`CryptoError::public_message`] instead, which never says why an
/// authenticated decryption was rejected.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The key is not exactly [`KEY_LEN`] bytes.
    #[error("invalid key length: expected {expected} bytes, got {got}")]
    KeyInit { expected: usize, got: usize },

    /// The OS random source could not produce a nonce.
    #[error("secure random source unavailable")]
    RandomSource,

    /// The decoded message is too short to contain a nonce.
    #[error("sealed message is {len} bytes, shorter than the nonce")]
    MalformedInput { len: usize },

    /// The text is not valid standard base64.
    #[error("invalid base64 encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Tag verification failed: tampered data, wrong key, or truncation.
    #[error("authentication failed")]
    Authentication,

    /// The AEAD refused to seal the payload.
    #[error("aead seal failed")]
    SealFailed,

    /// Authenticated plaintext is not valid UTF-8 and cannot be returned as text.
    #[error("decrypted payload is not valid UTF-8")]
    InvalidText,

    /// A JSON payload could not be serialised, or decrypted text is not JSON.
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

impl CryptoError {
    /// Build a [`CryptoError::KeyInit`] for a key of `got` bytes.
    pub fn key_len(got: usize) -> Self {
        CryptoError::KeyInit {
            expected: KEY_LEN,
            got,
        }
    }

    /// Message safe to hand to an untrusted caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            CryptoError::KeyInit { .. } => "cipher initialisation failed",
            CryptoError::RandomSource => "nonce generation failed",
            CryptoError::MalformedInput { .. } => "malformed encrypted data",
            CryptoError::Encoding(_) => "invalid base64 encoding",
            CryptoError::SealFailed => "encryption failed",
            CryptoError::InvalidJson(_) => "invalid JSON data",
            CryptoError::Authentication | CryptoError::InvalidText => "decryption failed",
        }
    }

    /// Stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CryptoError::KeyInit { .. } => "key_init",
            CryptoError::RandomSource => "random_source",
            CryptoError::MalformedInput { .. } => "malformed_input",
            CryptoError::Encoding(_) => "encoding",
            CryptoError::Authentication => "authentication",
            CryptoError::SealFailed => "seal_failed",
            CryptoError::InvalidText => "invalid_text",
            CryptoError::InvalidJson(_) => "invalid_json",
        }
    }
}

impl From<&CryptoError> for ServiceError {
    fn from(e: &CryptoError) -> Self {
        let msg = e.public_message().to_owned();
        match e {
            CryptoError::KeyInit { .. } | CryptoError::RandomSource | CryptoError::SealFailed => {
                ServiceError::CryptoFailure(msg)
            }
            CryptoError::MalformedInput { .. }
            | CryptoError::Encoding(_)
            | CryptoError::Authentication
            | CryptoError::InvalidText
            | CryptoError::InvalidJson(_) => ServiceError::BadRequest(msg),
        }
    }
}
