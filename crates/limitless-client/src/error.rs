//! Error types for the Limitless API client
//!
//! Remote errors are classified into dedicated variants where the API's
//! error text has a documented meaning:
//! - "Signer does not match" => wrong auth client mode or wrong address
//! - "Invalid token ID" / "Position not found" => stale or mismatched
//!   position id; callers must re-fetch position ids from the current
//!   market record
//!
//! Empty result sets are never errors: "no market found" is `Ok(None)`
//! or an empty `Vec` at the call site.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for the Limitless client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response that did not match a documented error condition.
    #[error("HTTP {status} for {url}: {body}")]
    Status {
        /// Response status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Response body (may be empty).
        body: String,
    },

    /// Response body could not be decoded into the expected type.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Request URL.
        url: String,
        /// Decode failure detail.
        message: String,
    },

    /// HTTP 400 "Signer does not match": the login used the wrong client
    /// mode (eoa vs smart-wallet) or the wrong address for that mode.
    #[error("signer does not match: re-authenticate with the correct client mode and address")]
    SignerMismatch,

    /// The remote rejected a position (token) id as unknown.
    #[error("invalid token id: {0}")]
    InvalidTokenId(String),

    /// The remote could not find a position for the given id.
    #[error("position not found: {0}")]
    PositionNotFound(String),
}

impl ApiError {
    /// Classify a non-2xx response into an `ApiError`.
    ///
    /// Matches the documented error texts first, otherwise falls back to
    /// a generic `Status` variant carrying the raw body.
    pub(crate) fn from_status(status: StatusCode, url: &str, body: String) -> Self {
        if status == StatusCode::BAD_REQUEST && body.contains("Signer does not match") {
            return ApiError::SignerMismatch;
        }
        if body.contains("Invalid token ID") {
            return ApiError::InvalidTokenId(body);
        }
        if body.contains("Position not found") {
            return ApiError::PositionNotFound(body);
        }
        ApiError::Status { status, url: url.to_string(), body }
    }

    /// Whether a caller may reasonably retry the same request.
    ///
    /// Transport failures and 5xx responses are transient. Classified
    /// caller-misuse errors and other 4xx responses are terminal until the
    /// caller fixes its input (re-authenticate, re-fetch position ids).
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http(_) => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            ApiError::Decode { .. } => false,
            ApiError::SignerMismatch
            | ApiError::InvalidTokenId(_)
            | ApiError::PositionNotFound(_) => false,
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signer_mismatch_classification() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            "https://api.limitless.exchange/auth/login",
            r#"{"message":"Signer does not match the provided address"}"#.to_string(),
        );
        assert!(matches!(err, ApiError::SignerMismatch));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_invalid_token_id_classification() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            "https://api.limitless.exchange/orders",
            r#"{"message":"Invalid token ID"}"#.to_string(),
        );
        assert!(matches!(err, ApiError::InvalidTokenId(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_position_not_found_classification() {
        let err = ApiError::from_status(
            StatusCode::NOT_FOUND,
            "https://api.limitless.exchange/positions/1",
            r#"{"message":"Position not found"}"#.to_string(),
        );
        assert!(matches!(err, ApiError::PositionNotFound(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_server_errors_are_retryable() {
        let err = ApiError::from_status(
            StatusCode::BAD_GATEWAY,
            "https://api.limitless.exchange/markets/active/slugs",
            String::new(),
        );
        assert!(matches!(err, ApiError::Status { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_plain_client_errors_are_terminal() {
        let err = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "https://api.limitless.exchange/markets/search",
            "limit out of range".to_string(),
        );
        assert!(!err.is_retryable());
    }
}
