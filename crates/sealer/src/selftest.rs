//! Seal-then-open round trips on a sample, reported as a [`SelfTestReport`]
//! for text or a [`JsonSelfTestReport`] for structured values.

use common::{JsonSelfTestReport, SelfTestReport};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::envelope::{decrypt_json, decrypt_text, encrypt_json, encrypt_text};
use crate::key::KeyMaterial;

/// Sample used when the caller supplies none: ASCII, Hangul, and an emoji.
pub const DEFAULT_SAMPLE: &str = "Hello World! 안녕하세요! 🔐";

/// Encrypt `text`, decrypt the result, and report whether they match.
pub fn run(text: &str, key: &KeyMaterial) -> SelfTestReport {
    let mut report = SelfTestReport {
        success: false,
        original: text.to_owned(),
        encrypted: None,
        decrypted: None,
        encrypted_length: None,
        original_length: text.len(),
        error: None,
    };

    let encrypted = match encrypt_text(text, key) {
        Ok(e) => e,
        Err(e) => {
            warn!(kind = e.kind(), "self-test encrypt failed");
            report.error = Some(e.public_message().to_owned());
            return report;
        }
    };
    report.encrypted_length = Some(encrypted.len());

    match decrypt_text(&encrypted, key) {
        Ok(decrypted) => {
            report.success = decrypted == text;
            report.decrypted = Some(decrypted);
        }
        Err(e) => {
            warn!(kind = e.kind(), "self-test decrypt failed");
            report.error = Some(e.public_message().to_owned());
        }
    }
    report.encrypted = Some(encrypted);

    info!(success = report.success, "self-test completed");
    report
}

/// JSON sample used when the caller supplies none.
pub fn default_json_sample() -> Value {
    json!({
        "message": "Hello World!",
        "korean": "안녕하세요!",
        "numbers": [1, 2, 3],
        "nested": { "secure": true, "level": 1 }
    })
}

/// Seal `value` as JSON, open and parse it, and report whether they match.
pub fn run_json(value: &Value, key: &KeyMaterial) -> JsonSelfTestReport {
    let mut report = JsonSelfTestReport {
        success: false,
        original: value.clone(),
        encrypted: None,
        decrypted: None,
        encrypted_length: None,
        error: None,
    };

    let encrypted = match encrypt_json(value, key) {
        Ok(e) => e,
        Err(e) => {
            warn!(kind = e.kind(), "json self-test encrypt failed");
            report.error = Some(e.public_message().to_owned());
            return report;
        }
    };
    report.encrypted_length = Some(encrypted.len());

    match decrypt_json(&encrypted, key) {
        Ok(decrypted) => {
            report.success = &decrypted == value;
            report.decrypted = Some(decrypted);
        }
        Err(e) => {
            warn!(kind = e.kind(), "json self-test decrypt failed");
            report.error = Some(e.public_message().to_owned());
        }
    }
    report.encrypted = Some(encrypted);

    info!(success = report.success, "json self-test completed");
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sample_round_trips() {
        let key = KeyMaterial::from_slice(&[9u8; 32]).unwrap();
        let report = run(DEFAULT_SAMPLE, &key);
        assert!(report.success);
        assert_eq!(report.decrypted.as_deref(), Some(DEFAULT_SAMPLE));
        assert_eq!(report.original_length, DEFAULT_SAMPLE.len());
        assert_eq!(
            report.encrypted_length,
            report.encrypted.as_ref().map(String::len)
        );
        assert!(report.error.is_none());
    }

    #[test]
    fn default_json_sample_round_trips() {
        let key = KeyMaterial::from_slice(&[9u8; 32]).unwrap();
        let sample = default_json_sample();
        let report = run_json(&sample, &key);
        assert!(report.success);
        assert_eq!(report.decrypted.as_ref(), Some(&sample));
        assert!(report.encrypted.is_some());
        assert!(report.error.is_none());
    }

    #[test]
    fn scalar_json_values_round_trip() {
        let key = KeyMaterial::from_slice(&[3u8; 32]).unwrap();
        for value in [json!("just a string"), json!(42), json!(null), json!([])] {
            assert!(run_json(&value, &key).success, "{value}");
        }
    }

    #[test]
    fn report_serialises_camel_case() {
        let key = KeyMaterial::from_slice(&[9u8; 32]).unwrap();
        let v = serde_json::to_value(run("x", &key)).unwrap();
        assert_eq!(v["originalLength"], 1);
        assert!(v.get("encryptedLength").is_some());
        assert!(v.get("error").is_none());
    }
}
