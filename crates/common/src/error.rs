//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::CryptoFailure`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller supplied input that no operation can accept: a missing
    /// argument, bad encoding, or a message that fails authentication.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No route or exported operation matches the request.
    #[error("not found: {0}")]
    NotFound(String),

    /// The cipher could not be initialised or the random source failed.
    #[error("crypto failure: {0}")]
    CryptoFailure(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::CryptoFailure(_) => 500,
        }
    }

    /// Short machine-readable code for [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::CryptoFailure(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::NotFound("x".into()).http_status(), 404);
        assert_eq!(ServiceError::CryptoFailure("x".into()).http_status(), 500);
    }

    #[test]
    fn codes_are_snake_case() {
        assert_eq!(ServiceError::NotFound("x".into()).code(), "not_found");
        assert_eq!(
            ServiceError::CryptoFailure("x".into()).code(),
            "internal_error"
        );
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("missing data".into());
        assert!(e.to_string().contains("missing data"));
    }
}
