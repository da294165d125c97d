//! HireTrack REST request client.
//!
//! A single choke point for outbound calls. Every call resolves to an
//! [`ApiResult`]: transport failures, timeouts and non-2xx responses all come
//! back as an [`ApiError`] with a stable status and message, never as a panic
//! or a raw `reqwest::Error`.
//!
//! # Example
//!
//! ```rust,ignore
//! use api_client::HttpClient;
//! use serde_json::Value;
//!
//! let mut client = HttpClient::new("http://localhost:8080/api")?;
//! client.set_auth_token("abc")?;
//!
//! match client.get::<Value>("/positions", None).await {
//!     Ok(success) => println!("{:?}", success.data),
//!     Err(failure) => eprintln!("{} ({})", failure.message, failure.status),
//! }
//! ```

pub mod body;
pub mod error;
pub mod headers;
pub mod types;

pub use error::{
    ApiError, ApiResult, ClientError, FailureKind, NETWORK_ERROR_MESSAGE, TIMEOUT_MESSAGE,
};
pub use types::{ApiSuccess, CredentialsMode, Method, RequestConfig, RequestDescriptor};

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Message used for successful responses whose body carries none.
pub const SUCCESS_MESSAGE: &str = "Request successful";

/// Construction-time settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub credentials: CredentialsMode,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            credentials: CredentialsMode::default(),
        }
    }
}

/// Response pieces captured inside the timeout race.
struct RawResponse {
    status: u16,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// REST client with instance-default headers and a cookie jar.
///
/// The bearer token lives in the default headers and is changed through
/// `&mut self`, so one client value is one session. Callers that share a
/// client across tasks should pass tokens per call with
/// [`RequestConfig::bearer`] instead.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    default_headers: HeaderMap,
    timeout: Duration,
    credentials: CredentialsMode,
    cookies: Arc<Jar>,
}

impl HttpClient {
    /// Create a client for `base_url` with the default timeout and credentials.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;

        // Redirects are followed by reqwest; cookies are managed by hand so the
        // credentials mode can be honoured per call.
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url,
            default_headers: headers::default_headers(),
            timeout: config.timeout,
            credentials: config.credentials,
            cookies: Arc::new(Jar::default()),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, mode: CredentialsMode) -> Self {
        self.credentials = mode;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Attach `Authorization: Bearer <token>` to every subsequent call.
    pub fn set_auth_token(&mut self, token: &str) -> Result<(), ClientError> {
        let value = headers::bearer_value(token)?;
        self.default_headers.insert(AUTHORIZATION, value);
        debug!("Auth token set on client defaults");
        Ok(())
    }

    pub fn clear_auth_token(&mut self) {
        self.default_headers.remove(AUTHORIZATION);
        debug!("Auth token cleared from client defaults");
    }

    /// Seed the cookie jar, e.g. with a session restored from storage.
    pub fn add_cookie(&self, cookie: &str, url: &Url) {
        self.cookies.add_cookie_str(cookie, url);
    }

    /// Absolute endpoints are used verbatim; relative ones are joined onto the base.
    pub fn resolve_url(&self, endpoint: &str) -> String {
        if is_absolute(endpoint) {
            return endpoint.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: Option<RequestConfig>,
    ) -> ApiResult<T> {
        self.send_with(Method::Get, endpoint, None::<&()>, config).await
    }

    pub async fn post<B, T>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with(Method::Post, endpoint, body, config).await
    }

    pub async fn put<B, T>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with(Method::Put, endpoint, body, config).await
    }

    pub async fn patch<B, T>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with(Method::Patch, endpoint, body, config).await
    }

    pub async fn delete<B, T>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with(Method::Delete, endpoint, body, config).await
    }

    async fn send_with<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut descriptor =
            RequestDescriptor::new(method, endpoint).with_config(config.unwrap_or_default());

        if let Some(body) = body {
            descriptor = descriptor.with_json(body).map_err(|e| {
                warn!(%method, endpoint, error = %e, "Failed to encode request body");
                ApiError::invalid_body()
            })?;
        }

        self.request(descriptor).await
    }

    /// Dispatch a descriptor and normalize the outcome.
    pub async fn request<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> ApiResult<T> {
        let RequestDescriptor {
            method,
            endpoint,
            body,
            config,
        } = descriptor;

        let url = self.resolve_url(&endpoint);
        let url = Url::parse(&url).map_err(|e| {
            warn!(%method, url = %url, error = %e, "Request URL is not valid");
            ApiError::network()
        })?;

        let timeout = config.timeout.unwrap_or(self.timeout);
        let credentials = config.credentials.unwrap_or(self.credentials);

        let mut request = self
            .http
            .request(method.into(), url.clone())
            .headers(headers::merge_headers(&self.default_headers, &config.headers));

        if let Some(cookie) = self.cookie_header(&url, credentials) {
            request = request.header(COOKIE, cookie);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        debug!(%method, url = %url, timeout_ms = timeout.as_millis() as u64, "Dispatching request");

        let raw = match tokio::time::timeout(timeout, self.execute(request, &url, credentials)).await {
            Ok(outcome) => outcome?,
            Err(_) => {
                warn!(%method, url = %url, "Request timed out");
                return Err(ApiError::timeout());
            }
        };

        debug!(%method, url = %url, status = raw.status, "Response received");
        into_result(raw)
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
        credentials: CredentialsMode,
    ) -> Result<RawResponse, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::timeout()
            } else {
                warn!(url = %url, error = %e, "Network request failed");
                ApiError::network()
            }
        })?;

        if self.accepts_cookies_from(url, credentials) {
            let mut set_cookies = response.headers().get_all(SET_COOKIE).iter();
            self.cookies.set_cookies(&mut set_cookies, url);
        }

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to read response body");
            ApiError::network()
        })?;

        Ok(RawResponse {
            status,
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    /// Whether cookies may travel to or from `url` under `credentials`.
    fn accepts_cookies_from(&self, url: &Url, credentials: CredentialsMode) -> bool {
        match credentials {
            CredentialsMode::Omit => false,
            CredentialsMode::Include => true,
            CredentialsMode::SameOrigin => url.origin() == self.base_url.origin(),
        }
    }

    fn cookie_header(&self, url: &Url, credentials: CredentialsMode) -> Option<HeaderValue> {
        if self.accepts_cookies_from(url, credentials) {
            self.cookies.cookies(url)
        } else {
            None
        }
    }
}

/// `http://` or `https://`, in any letter case.
fn is_absolute(endpoint: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        endpoint
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

fn into_result<T: DeserializeOwned>(raw: RawResponse) -> ApiResult<T> {
    let parsed = body::parse_body(raw.content_type.as_deref(), &raw.bytes);

    if !(200..300).contains(&raw.status) {
        return Err(ApiError::http(raw.status, parsed));
    }

    let message =
        body::message_from_body(parsed.as_ref()).unwrap_or_else(|| SUCCESS_MESSAGE.to_string());
    Ok(ApiSuccess {
        status: raw.status,
        message,
        data: parsed.and_then(body::decode_payload),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new("http://api.test").unwrap()
    }

    #[test]
    fn relative_endpoints_join_base() {
        let client = client();
        assert_eq!(client.resolve_url("/things"), "http://api.test/things");
        assert_eq!(client.resolve_url("things"), "http://api.test/things");

        let nested = HttpClient::new("http://api.test/v1/").unwrap();
        assert_eq!(nested.resolve_url("/things?page=2"), "http://api.test/v1/things?page=2");
    }

    #[test]
    fn absolute_endpoints_are_verbatim() {
        assert_eq!(
            client().resolve_url("https://other.test/x"),
            "https://other.test/x"
        );
        assert_eq!(client().resolve_url("HTTPS://other.test/x"), "HTTPS://other.test/x");
        assert_eq!(client().resolve_url("Http://other.test/x"), "Http://other.test/x");
        assert_eq!(client().resolve_url("httpbin/x"), "http://api.test/httpbin/x");
    }

    #[test]
    fn same_origin_only_trusts_the_base_origin() {
        let client = client().with_credentials(CredentialsMode::SameOrigin);
        let own = Url::parse("http://api.test/session").unwrap();
        let other = Url::parse("http://tracker.test/pixel").unwrap();

        assert!(client.accepts_cookies_from(&own, CredentialsMode::SameOrigin));
        assert!(!client.accepts_cookies_from(&other, CredentialsMode::SameOrigin));
        assert!(client.accepts_cookies_from(&other, CredentialsMode::Include));
        assert!(!client.accepts_cookies_from(&own, CredentialsMode::Omit));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpClient::new("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn defaults_include_content_type_and_timeout() {
        let client = client();
        assert_eq!(client.timeout(), Duration::from_secs(30));
        assert_eq!(client.default_headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(client.default_headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn auth_token_set_and_clear() {
        let mut client = client();
        client.set_auth_token("abc").unwrap();
        assert_eq!(client.default_headers().get(AUTHORIZATION).unwrap(), "Bearer abc");

        client.clear_auth_token();
        assert!(client.default_headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn non_success_status_becomes_failure() {
        let raw = RawResponse {
            status: 404,
            content_type: Some("application/json".into()),
            bytes: br#"{"error":"not found"}"#.to_vec(),
        };
        let err = into_result::<serde_json::Value>(raw).unwrap_err();
        assert_eq!(err.status, 404);
        assert_eq!(err.message, "not found");
    }

    #[test]
    fn success_without_message_uses_default() {
        let raw = RawResponse {
            status: 204,
            content_type: None,
            bytes: Vec::new(),
        };
        let ok = into_result::<serde_json::Value>(raw).unwrap();
        assert_eq!(ok.status, 204);
        assert_eq!(ok.message, SUCCESS_MESSAGE);
        assert!(ok.data.is_none());
    }

    #[test]
    fn same_origin_cookies_stay_on_base_host() {
        let client = client();
        let base = Url::parse("http://api.test/").unwrap();
        client.add_cookie("sid=1; Path=/", &base);

        let same = Url::parse("http://api.test/things").unwrap();
        let other = Url::parse("http://other.test/things").unwrap();

        assert!(client.cookie_header(&same, CredentialsMode::SameOrigin).is_some());
        assert!(client.cookie_header(&other, CredentialsMode::SameOrigin).is_none());
        assert!(client.cookie_header(&same, CredentialsMode::Omit).is_none());
    }
}
