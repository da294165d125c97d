//! Error types for the request client.
//!
//! Dispatch never returns anything but an [`ApiResult`]: every transport,
//! timeout and HTTP failure is folded into an [`ApiError`]. [`ClientError`]
//! only covers mistakes made while configuring a client.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::ApiSuccess;

/// Message reported when no response was received at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// Message reported when the timeout race is lost.
pub const TIMEOUT_MESSAGE: &str = "Request timeout. Please try again.";

/// Message reported when the outgoing body could not be encoded.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Status used for failures where no response was received.
pub const NETWORK_STATUS: u16 = 0;

/// Status used when a call exceeds its timeout.
pub const TIMEOUT_STATUS: u16 = 408;

/// The result envelope returned by every request-client call.
pub type ApiResult<T> = std::result::Result<ApiSuccess<T>, ApiError>;

/// Why a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// DNS failure, connection refused, reset mid-body
    Network,
    /// The call did not complete within its timeout
    Timeout,
    /// A response arrived with a non-2xx status
    Http,
    /// The request could not be built (unencodable body)
    Request,
}

/// Failure side of the result envelope.
///
/// `status` is 0 for network-level and request-building failures, 408 for
/// timeouts, and the response status otherwise. It is never 2xx.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message} (status {status})")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub kind: FailureKind,
    /// Parsed response body, when a response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ApiError {
    pub fn network() -> Self {
        Self {
            status: NETWORK_STATUS,
            message: NETWORK_ERROR_MESSAGE.to_string(),
            kind: FailureKind::Network,
            body: None,
        }
    }

    pub fn timeout() -> Self {
        Self {
            status: TIMEOUT_STATUS,
            message: TIMEOUT_MESSAGE.to_string(),
            kind: FailureKind::Timeout,
            body: None,
        }
    }

    pub fn invalid_body() -> Self {
        Self {
            status: NETWORK_STATUS,
            message: INVALID_BODY_MESSAGE.to_string(),
            kind: FailureKind::Request,
            body: None,
        }
    }

    /// Build the failure for a non-2xx response.
    ///
    /// The message comes from the body's `message` field, then its `error`
    /// field, and falls back to `HTTP <status>`.
    pub fn http(status: u16, body: Option<Value>) -> Self {
        let message = crate::body::message_from_body(body.as_ref())
            .unwrap_or_else(|| format!("HTTP {}", status));

        Self {
            status,
            message,
            kind: FailureKind::Http,
            body,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == FailureKind::Timeout
    }

    pub fn is_network(&self) -> bool {
        self.kind == FailureKind::Network
    }
}

/// Errors raised while constructing or reconfiguring a client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid header {0}")]
    InvalidHeader(String),

    #[error("Unknown credentials mode '{0}' (expected include, omit or same-origin)")]
    InvalidCredentials(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_error_prefers_message_field() {
        let err = ApiError::http(422, Some(json!({"message": "bad email", "error": "invalid"})));
        assert_eq!(err.message, "bad email");
        assert_eq!(err.status, 422);
        assert_eq!(err.kind, FailureKind::Http);
    }

    #[test]
    fn http_error_falls_back_to_error_field() {
        let err = ApiError::http(404, Some(json!({"error": "not found"})));
        assert_eq!(err.message, "not found");
    }

    #[test]
    fn http_error_synthesizes_status_message() {
        assert_eq!(ApiError::http(500, None).message, "HTTP 500");
        assert_eq!(
            ApiError::http(502, Some(json!("upstream unavailable"))).message,
            "HTTP 502"
        );
    }

    #[test]
    fn fixed_failures_use_reserved_statuses() {
        assert_eq!(ApiError::network().status, 0);
        assert!(ApiError::network().is_network());
        assert_eq!(ApiError::timeout().status, 408);
        assert!(ApiError::timeout().is_timeout());
        assert_eq!(ApiError::invalid_body().kind, FailureKind::Request);
    }
}
