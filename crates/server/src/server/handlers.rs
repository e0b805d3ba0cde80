//! Axum request handlers for all service endpoints.
//!
//! Body extractors are taken as `Result<Json<T>, JsonRejection>` so a body
//! axum cannot parse still gets a failure envelope instead of a plain-text
//! rejection.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DecryptRequest, EncryptRequest, ErrorResponse, HealthResponse, JsonSelfTestRequest,
    SecureDataResponse, SelfTestRequest, ServerInfo,
};
use common::{ResultEnvelope, SecureDataReply, ServiceError};
use sealer::{envelope, selftest, CryptoError};
use serde_json::Value;
use tracing::{info, warn};

use super::middleware::REQUEST_ID_HEADER;
use super::state::AppState;

/// `POST /api/encrypt` — seal the `data` field.
///
/// Responds `200` with a success envelope, `400` with a failure envelope if
/// the body is unreadable or `data` is absent, and `500` if the cipher or
/// random source fails.
pub async fn encrypt(
    State(state): State<AppState>,
    payload: Result<Json<EncryptRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected_body("encrypt", &rejection),
    };
    let Some(plaintext) = req.data else {
        return envelope_response(
            StatusCode::BAD_REQUEST,
            ResultEnvelope::failure("data is required"),
        );
    };

    match envelope::encrypt_text(&plaintext, &state.key) {
        Ok(encoded) => envelope_response(StatusCode::OK, envelope::sealed(encoded)),
        Err(e) => failure_response("encrypt", &e),
    }
}

/// `POST /api/decrypt` — open the `encryptedData` field.
///
/// Every rejection of caller input (bad base64, short or tampered message,
/// wrong key) is `400` with the same opaque messages the envelope uses.
pub async fn decrypt(
    State(state): State<AppState>,
    payload: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected_body("decrypt", &rejection),
    };
    let Some(encoded) = req.encrypted_data else {
        return envelope_response(
            StatusCode::BAD_REQUEST,
            ResultEnvelope::failure("encryptedData is required"),
        );
    };

    match envelope::decrypt_text(&encoded, &state.key) {
        Ok(plaintext) => envelope_response(StatusCode::OK, envelope::opened(plaintext)),
        Err(e) => failure_response("decrypt", &e),
    }
}

/// `POST /api/invoke/:name` — call an exported operation by name.
///
/// The envelope is the contract here, so any known operation answers `200`
/// whether it succeeded or not. Unknown names are `404`.
pub async fn invoke(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<EncryptRequest>, JsonRejection>,
) -> Response {
    if !state.exports.contains(&name) {
        let err = ServiceError::NotFound(format!("unknown operation: {name}"));
        return error_response(&err);
    }
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected_body("invoke", &rejection),
    };
    let Some(arg) = req.data else {
        return envelope_response(
            StatusCode::BAD_REQUEST,
            ResultEnvelope::failure("data is required"),
        );
    };
    envelope_response(StatusCode::OK, state.exports.invoke(&name, &arg))
}

/// `GET /api/crypto-info` — non-reversing key metadata.
pub async fn crypto_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.key.info())
}

/// `GET /api/ready` — announce (once) and report the exported operations.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.exports.announce())
}

/// `POST /api/test-encryption` — round-trip self-test.
///
/// Uses [`selftest::DEFAULT_SAMPLE`] when `testData` is absent. Responds `500`
/// if the round trip does not reproduce the input.
pub async fn self_test(
    State(state): State<AppState>,
    payload: Result<Json<SelfTestRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected_body("self_test", &rejection),
    };
    let text = req
        .test_data
        .unwrap_or_else(|| selftest::DEFAULT_SAMPLE.to_owned());
    let report = selftest::run(&text, &state.key);
    let status = if report.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(report)).into_response()
}

/// `POST /api/test-json-encryption` — JSON round-trip self-test.
///
/// `testData` may be any JSON value; [`selftest::default_json_sample`] is used
/// when it is absent or `null`.
pub async fn json_self_test(
    State(state): State<AppState>,
    payload: Result<Json<JsonSelfTestRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected_body("json_self_test", &rejection),
    };
    let value = req.test_data.unwrap_or_else(selftest::default_json_sample);
    let report = selftest::run_json(&value, &state.key);
    let status = if report.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(report)).into_response()
}

/// `POST /api/secure-data` — sealed request, sealed reply.
///
/// Opens `encryptedData`, wraps the payload in a [`SecureDataReply`], and
/// answers with that reply sealed as JSON. A plaintext that is not JSON is
/// echoed back as a JSON string. Failures use the same envelope and status
/// rules as `/api/decrypt`.
pub async fn secure_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejected_body("secure_data", &rejection),
    };
    let Some(encoded) = req.encrypted_data else {
        return envelope_response(
            StatusCode::BAD_REQUEST,
            ResultEnvelope::failure("encryptedData is required"),
        );
    };

    let received_data = match envelope::decrypt_text(&encoded, &state.key) {
        Ok(text) => received_value(text),
        Err(e) => return failure_response("secure_data", &e),
    };

    let reply = SecureDataReply {
        received_data,
        processed_at: unix_now(),
        server_info: ServerInfo {
            version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: state.environment.as_ref().clone(),
            uptime_secs: state.started_at.elapsed().as_secs(),
        },
    };
    let sealed = serde_json::to_value(&reply)
        .map_err(CryptoError::InvalidJson)
        .and_then(|value| envelope::encrypt_json(&value, &state.key));

    match sealed {
        Ok(encrypted_data) => {
            let request_id = headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            info!(request_id = ?request_id, "secure data processed");
            let body = SecureDataResponse {
                success: true,
                encrypted_data,
                request_id,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => failure_response("secure_data", &e),
    }
}

/// `GET /health` — liveness check.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
        environment: state.environment.as_ref().clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        functions: state.exports.names(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn received_value(text: String) -> Value {
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn envelope_response(status: StatusCode, body: ResultEnvelope) -> Response {
    (status, Json(body)).into_response()
}

/// Answer an unparseable body with `400` and a failure envelope. Only the
/// rejection status is logged; axum's message can quote the body.
fn rejected_body(operation: &'static str, rejection: &JsonRejection) -> Response {
    warn!(operation, rejection = %rejection.status(), "request body rejected");
    envelope_response(
        StatusCode::BAD_REQUEST,
        ResultEnvelope::failure("invalid request body"),
    )
}

/// Log the failure kind (never the payload) and answer with a failure envelope.
fn failure_response(operation: &'static str, err: &CryptoError) -> Response {
    warn!(operation, kind = err.kind(), "crypto operation rejected");
    let status = status_of(&ServiceError::from(err));
    envelope_response(status, envelope::failed(err))
}

fn error_response(err: &ServiceError) -> Response {
    let body = ErrorResponse::new(err.code(), err.to_string());
    (status_of(err), Json(body)).into_response()
}

fn status_of(err: &ServiceError) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
