//! Error types for HireTrack services.

use std::path::PathBuf;

use api_client::{ApiError, ClientError};
use thiserror::Error;

/// Result type for HireTrack operations.
pub type Result<T> = std::result::Result<T, HireTrackError>;

/// Domain-level errors.
#[derive(Debug, Error)]
pub enum HireTrackError {
    /// A service call failed. `message` is fixed per operation and safe to show;
    /// the transport detail is kept as the source.
    #[error("{message}")]
    Request {
        message: &'static str,
        #[source]
        source: RequestFailure,
    },

    /// A required field was missing before any call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reading or writing the persisted auth state failed
    #[error("Storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}

/// Underlying cause of a [`HireTrackError::Request`].
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The call succeeded but the body did not carry the expected entity
    #[error("response did not include the expected payload (status {status})")]
    MissingPayload { status: u16 },
}

impl HireTrackError {
    pub(crate) fn request(message: &'static str, source: impl Into<RequestFailure>) -> Self {
        HireTrackError::Request {
            message,
            source: source.into(),
        }
    }

    /// The HTTP status behind a request failure, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            HireTrackError::Request {
                source: RequestFailure::Api(err),
                ..
            } => Some(err.status),
            HireTrackError::Request {
                source: RequestFailure::MissingPayload { status },
                ..
            } => Some(*status),
            _ => None,
        }
    }

    /// The normalized transport failure behind a request failure.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            HireTrackError::Request {
                source: RequestFailure::Api(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn request_error_keeps_fixed_message_and_cause() {
        let err = HireTrackError::request(
            "Failed to fetch applicants",
            ApiError::http(503, Some(serde_json::json!({"message": "maintenance"}))),
        );

        assert_eq!(err.to_string(), "Failed to fetch applicants");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.api_error().unwrap().message, "maintenance");

        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "maintenance (status 503)");
    }

    #[test]
    fn missing_payload_reports_status() {
        let err = HireTrackError::request(
            "Failed to fetch applicant",
            RequestFailure::MissingPayload { status: 204 },
        );
        assert_eq!(err.status(), Some(204));
        assert!(err.api_error().is_none());
    }
}
