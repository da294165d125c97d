//! Request descriptors, per-call configuration and the success envelope.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::headers::bearer_value;

/// HTTP verbs the client dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Whether stored cookies travel with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsMode {
    /// Attach cookies to every request
    Include,
    /// Never attach or store cookies
    Omit,
    /// Attach cookies only when the target shares the base origin
    #[default]
    SameOrigin,
}

impl FromStr for CredentialsMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "include" => Ok(CredentialsMode::Include),
            "omit" => Ok(CredentialsMode::Omit),
            "same-origin" | "same_origin" => Ok(CredentialsMode::SameOrigin),
            other => Err(ClientError::InvalidCredentials(other.to_string())),
        }
    }
}

/// Per-call overrides layered on top of the client defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub headers: HeaderMap,
    pub credentials: Option<CredentialsMode>,
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a header from strings, rejecting names or values that are not valid HTTP.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, ClientError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::InvalidHeader(name.to_string()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader(name.to_string()))?;
        Ok(self.header(header_name, header_value))
    }

    /// Authorize this call only, leaving the client defaults untouched.
    pub fn bearer(self, token: &str) -> Result<Self, ClientError> {
        let value = bearer_value(token)?;
        Ok(self.header(reqwest::header::AUTHORIZATION, value))
    }

    pub fn credentials(mut self, mode: CredentialsMode) -> Self {
        self.credentials = Some(mode);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Everything needed to dispatch one call. Consumed by dispatch.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub endpoint: String,
    pub body: Option<Value>,
    pub config: RequestConfig,
}

impl RequestDescriptor {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            config: RequestConfig::default(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Encode any serializable value as the JSON body.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> serde_json::Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }
}

/// Success side of the result envelope.
///
/// `status` is always the transport's 2xx status. `data` is empty when the
/// body was absent, unparseable, of a non-JSON/non-text type, or did not fit `T`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiSuccess<T> {
    pub status: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiSuccess<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiSuccess<U> {
        ApiSuccess {
            status: self.status,
            message: self.message,
            data: self.data.map(f),
        }
    }
}
