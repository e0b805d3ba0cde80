//! Text-level encrypt/decrypt and their [`ResultEnvelope`] boundary.
//!
//! [`encrypt_text`] / [`decrypt_text`] return typed errors for callers that
//! need the failure kind (the HTTP layer picks a status code from it).
//! [`encrypt`] / [`decrypt`] are the boundary operations: every failure is
//! folded into a failure envelope carrying only the public message.
//!
//! [`encrypt_json`] / [`decrypt_json`] seal a structured value as its
//! compact JSON text, for peers that exchange objects rather than strings.

use common::ResultEnvelope;
use serde_json::Value;
use tracing::debug;

use crate::cipher;
use crate::codec;
use crate::error::CryptoError;
use crate::key::KeyMaterial;

/// Seal `plaintext` and return the base64 sealed message.
pub fn encrypt_text(plaintext: &str, key: &KeyMaterial) -> Result<String, CryptoError> {
    let sealed = cipher::seal(plaintext.as_bytes(), key)?;
    Ok(codec::encode(sealed))
}

/// Decode and open a base64 sealed message, returning the plaintext text.
pub fn decrypt_text(encoded: &str, key: &KeyMaterial) -> Result<String, CryptoError> {
    let sealed = codec::decode(encoded)?;
    let plaintext = cipher::open(&sealed, key)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidText)
}

/// Serialise `value` to compact JSON and seal it.
pub fn encrypt_json(value: &Value, key: &KeyMaterial) -> Result<String, CryptoError> {
    let text = serde_json::to_string(value).map_err(CryptoError::InvalidJson)?;
    encrypt_text(&text, key)
}

/// Open a sealed message and parse the plaintext as JSON.
pub fn decrypt_json(encoded: &str, key: &KeyMaterial) -> Result<Value, CryptoError> {
    let text = decrypt_text(encoded, key)?;
    serde_json::from_str(&text).map_err(CryptoError::InvalidJson)
}

/// Envelope for a successful encrypt: the length is that of the encoded text.
pub fn sealed(encoded: String) -> ResultEnvelope {
    let length = encoded.len();
    ResultEnvelope::success(encoded, length)
}

/// Envelope for a successful decrypt: the length is the plaintext byte count.
pub fn opened(plaintext: String) -> ResultEnvelope {
    let length = plaintext.len();
    ResultEnvelope::success(plaintext, length)
}

/// Envelope for any failure.
pub fn failed(err: &CryptoError) -> ResultEnvelope {
    ResultEnvelope::failure(err.public_message())
}

/// The `encrypt` boundary operation.
pub fn encrypt(plaintext: &str, key: &KeyMaterial) -> ResultEnvelope {
    match encrypt_text(plaintext, key) {
        Ok(encoded) => sealed(encoded),
        Err(e) => {
            debug!(kind = e.kind(), "encrypt rejected");
            failed(&e)
        }
    }
}

/// The `decrypt` boundary operation.
pub fn decrypt(encoded: &str, key: &KeyMaterial) -> ResultEnvelope {
    match decrypt_text(encoded, key) {
        Ok(plaintext) => opened(plaintext),
        Err(e) => {
            debug!(kind = e.kind(), "decrypt rejected");
            failed(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{NONCE_LEN, TAG_LEN};

    fn key(fill: u8) -> KeyMaterial {
        KeyMaterial::from_slice(&[fill; 32]).unwrap()
    }

    #[test]
    fn hello_world_round_trip() {
        let k = key(0x42);
        let env = encrypt("hello world", &k);
        assert!(env.success);
        let data = env.data.clone().unwrap();
        assert_eq!(env.length, Some(data.len()));
        assert_eq!(codec::decode(&data).unwrap().len(), NONCE_LEN + 11 + TAG_LEN);

        let back = decrypt(&data, &k);
        assert_eq!(back, ResultEnvelope::success("hello world", 11));
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let k = key(1);
        let env = encrypt("", &k);
        assert!(env.success);
        let back = decrypt(env.data.as_deref().unwrap(), &k);
        assert_eq!(back.data.as_deref(), Some(""));
        assert_eq!(back.length, Some(0));
    }

    #[test]
    fn multibyte_length_counts_bytes() {
        let k = key(2);
        let text = "안녕하세요! 🔐";
        let env = encrypt(text, &k);
        let back = decrypt(env.data.as_deref().unwrap(), &k);
        assert_eq!(back.data.as_deref(), Some(text));
        assert_eq!(back.length, Some(text.len()));
    }

    #[test]
    fn invalid_base64_is_encoding_failure() {
        let env = decrypt("not-valid-base64!!", &key(3));
        assert!(!env.success);
        assert!(env.data.is_none());
        assert!(env.error.unwrap().contains("base64"));
    }

    #[test]
    fn short_input_is_malformed() {
        let env = decrypt(&codec::encode([0u8; 4]), &key(4));
        assert_eq!(env.error.as_deref(), Some("malformed encrypted data"));
    }

    #[test]
    fn wrong_key_and_tamper_share_one_message() {
        let sealed_b64 = encrypt_text("secret", &key(5)).unwrap();
        let wrong_key = decrypt(&sealed_b64, &key(6));

        let mut raw = codec::decode(&sealed_b64).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x80;
        let tampered = decrypt(&codec::encode(raw), &key(5));

        assert!(!wrong_key.success && !tampered.success);
        assert_eq!(wrong_key.error, tampered.error);
        assert_eq!(wrong_key.error.as_deref(), Some("decryption failed"));
    }

    #[test]
    fn json_value_round_trips() {
        let k = key(8);
        let value = serde_json::json!({
            "user": "kim",
            "tags": ["a", "b"],
            "nested": { "n": 1, "ok": true },
            "note": "안녕하세요 🔐"
        });
        let sealed_b64 = encrypt_json(&value, &k).unwrap();
        assert_eq!(decrypt_json(&sealed_b64, &k).unwrap(), value);
    }

    #[test]
    fn json_seal_is_readable_as_text() {
        let k = key(9);
        let sealed_b64 = encrypt_json(&serde_json::json!({ "a": 1 }), &k).unwrap();
        assert_eq!(decrypt_text(&sealed_b64, &k).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn decrypt_json_rejects_plain_text() {
        let k = key(10);
        let sealed_b64 = encrypt_text("not json at all", &k).unwrap();
        let err = decrypt_json(&sealed_b64, &k).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidJson(_)));
        assert_eq!(err.public_message(), "invalid JSON data");
    }

    #[test]
    fn decrypt_json_keeps_authentication_failures() {
        let sealed_b64 = encrypt_json(&serde_json::json!([1, 2, 3]), &key(11)).unwrap();
        assert!(matches!(
            decrypt_json(&sealed_b64, &key(12)),
            Err(CryptoError::Authentication)
        ));
    }

    #[test]
    fn non_utf8_plaintext_is_rejected_as_text() {
        let k = key(7);
        let sealed = cipher::seal(&[0xff, 0xfe, 0xfd], &k).unwrap();
        assert!(matches!(
            decrypt_text(&codec::encode(sealed), &k),
            Err(CryptoError::InvalidText)
        ));
    }
}
