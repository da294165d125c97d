//! Per-resource service functions over the request client.
//!
//! Each operation reads the bearer token from the [`AuthStore`] right before
//! its call, passes it as a per-call header, and turns a failure envelope
//! into a [`HireTrackError::Request`] with a fixed message.

pub mod applicants;
pub mod positions;

pub use applicants::ApplicantService;
pub use positions::PositionService;

use api_client::{ApiError, ApiResult, RequestConfig};
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::AuthStore;
use crate::error::{HireTrackError, RequestFailure, Result};

/// Body for batch deletes.
#[derive(Debug, Serialize)]
pub(crate) struct IdsBody<'a> {
    pub ids: &'a [String],
}

/// Per-call config carrying the stored token, if any.
pub(crate) fn auth_config(auth: &AuthStore) -> Result<Option<RequestConfig>> {
    match auth.token()? {
        Some(token) => Ok(Some(RequestConfig::new().bearer(&token)?)),
        None => Ok(None),
    }
}

/// `collection/{id}` with the id percent-encoded.
pub(crate) fn resource_path(collection: &str, id: &str) -> Result<String> {
    if id.trim().is_empty() {
        return Err(HireTrackError::Validation("id is required".to_string()));
    }
    Ok(format!("{}/{}", collection, urlencoding::encode(id)))
}

pub(crate) fn require_ids(ids: &[String]) -> Result<()> {
    if ids.is_empty() {
        return Err(HireTrackError::Validation("at least one id is required".to_string()));
    }
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(HireTrackError::Validation("ids must not be blank".to_string()));
    }
    Ok(())
}

/// Unwrap a read. A 2xx without a usable entity is
/// [`RequestFailure::MissingPayload`], since a read has nothing else to return.
pub(crate) fn expect_payload<T>(result: ApiResult<T>, message: &'static str) -> Result<T> {
    match result {
        Ok(success) => {
            let status = success.status;
            success.data.ok_or_else(|| {
                warn!(status, "{}: response carried no usable payload", message);
                HireTrackError::request(message, RequestFailure::MissingPayload { status })
            })
        }
        Err(err) => Err(translate(err, message)),
    }
}

/// Unwrap a mutation. The server has committed once it answers 2xx, so a body
/// without a usable entity is still a success.
pub(crate) fn optional_payload<T>(result: ApiResult<T>, message: &'static str) -> Result<Option<T>> {
    match result {
        Ok(success) => {
            if success.data.is_none() {
                debug!(
                    status = success.status,
                    response = %success.message,
                    "Mutation returned no entity"
                );
            }
            Ok(success.data)
        }
        Err(err) => Err(translate(err, message)),
    }
}

/// Check a call whose payload is irrelevant.
pub(crate) fn expect_success<T>(result: ApiResult<T>, message: &'static str) -> Result<()> {
    result.map(|_| ()).map_err(|err| translate(err, message))
}

fn translate(err: ApiError, message: &'static str) -> HireTrackError {
    warn!(
        status = err.status,
        kind = ?err.kind,
        error = %err.message,
        "{}",
        message
    );
    HireTrackError::request(message, err)
}
