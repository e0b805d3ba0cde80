//! Request and response types exchanged between the sealer core and its callers.
//!
//! Field names are camelCase on the wire so the JSON matches what browser-side
//! callers already consume.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Uniform outcome of an `encrypt` or `decrypt` call.
///
/// Exactly one of `data` / `error` is populated, selected by `success`. Build
/// values through [`ResultEnvelope::success`] and [`ResultEnvelope::failure`]
/// so the invariant holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Encoded sealed message (encrypt) or recovered plaintext (decrypt).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Length of the encoded output (encrypt) or plaintext bytes (decrypt).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Human-readable failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEnvelope {
    /// A successful outcome carrying `data` and its reported `length`.
    pub fn success(data: impl Into<String>, length: usize) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            length: Some(length),
            error: None,
        }
    }

    /// A failed outcome carrying only a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            length: None,
            error: Some(message.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Non-reversing metadata about the configured key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    /// Short prefix of a one-way digest of the key, suffixed with `...`.
    pub key_hash: String,
    /// Key length in bytes.
    pub key_size: usize,
    /// Cipher and mode identifier, e.g. `"AES-256-GCM"`.
    pub algorithm: String,
}

/// Announcement that the named operations are callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyReport {
    /// Always `"ready"`.
    pub status: String,
    /// Names callable through the export table.
    pub functions: Vec<String>,
}

/// Outcome of a seal-then-open round trip on a sample text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfTestReport {
    /// `true` only if the decrypted text equals the original.
    pub success: bool,
    pub original: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decrypted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_length: Option<usize>,
    /// Length of the original text in bytes.
    pub original_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of sealing a JSON value and parsing it back after opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSelfTestReport {
    /// `true` only if the parsed value equals the original.
    pub success: bool,
    pub original: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decrypted: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// HTTP request bodies
// ---------------------------------------------------------------------------

/// Request body for `POST /api/encrypt` and `POST /api/invoke/:name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Plaintext (or, for `invoke`, the single string argument).
    #[serde(default)]
    pub data: Option<String>,
}

/// Request body for `POST /api/decrypt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    /// Base64-encoded sealed message.
    #[serde(default)]
    pub encrypted_data: Option<String>,
}

/// Request body for `POST /api/test-encryption`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfTestRequest {
    #[serde(default)]
    pub test_data: Option<String>,
}

/// Request body for `POST /api/test-json-encryption`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSelfTestRequest {
    /// Any JSON value; `null` or absent selects the built-in sample.
    #[serde(default)]
    pub test_data: Option<Value>,
}

// ---------------------------------------------------------------------------
// Sealed exchange
// ---------------------------------------------------------------------------

/// Plaintext of the reply sealed by `POST /api/secure-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureDataReply {
    /// The caller's payload as it was decrypted.
    pub received_data: Value,
    /// Unix timestamp (seconds) at which the payload was processed.
    pub processed_at: u64,
    pub server_info: ServerInfo,
}

/// Build and runtime details echoed inside a [`SecureDataReply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub version: String,
    pub environment: String,
    pub uptime_secs: u64,
}

/// Response body for `POST /api/secure-data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureDataResponse {
    pub success: bool,
    /// Base64 sealed [`SecureDataReply`].
    pub encrypted_data: String,
    /// Value of the `x-request-id` header assigned to this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body for requests that never reach an operation
/// (unknown route, unknown export name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"not_found"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` once the server is accepting requests.
    pub status: String,
    /// Deployment environment label from configuration.
    pub environment: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Operations registered in the export table.
    pub functions: Vec<String>,
}
