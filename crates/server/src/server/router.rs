//! Axum router construction.

use axum::{
    http::{HeaderName, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
///
/// `origins` is the CORS allow-list; an empty list rejects every cross-origin
/// request.
pub fn build(state: AppState, origins: Vec<HeaderValue>) -> Router {
    let request_id = HeaderName::from_static(middleware::REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/crypto-info", get(handlers::crypto_info))
        .route("/api/ready", get(handlers::ready))
        .route("/api/encrypt", post(handlers::encrypt))
        .route("/api/decrypt", post(handlers::decrypt))
        .route("/api/invoke/:name", post(handlers::invoke))
        .route("/api/test-encryption", post(handlers::self_test))
        .route("/api/test-json-encryption", post(handlers::json_self_test))
        .route("/api/secure-data", post(handlers::secure_data))
        .fallback(handlers::not_found)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, middleware::UuidRequestId))
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .layer(middleware::cors(origins))
        .with_state(state)
}
