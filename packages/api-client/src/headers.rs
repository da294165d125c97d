//! Default headers and the per-call merge rule.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::ClientError;

/// Instance defaults every client starts with.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// `Bearer <token>` as a sensitive header value.
pub fn bearer_value(token: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ClientError::InvalidHeader(AUTHORIZATION.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Shallow merge: every key in `overrides` replaces the default for that key.
pub fn merge_headers(defaults: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    for name in overrides.keys() {
        merged.remove(name);
    }
    for (name, value) in overrides {
        merged.append(name.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::ACCEPT;

    #[test]
    fn empty_override_yields_defaults() {
        let defaults = default_headers();
        let merged = merge_headers(&defaults, &HeaderMap::new());
        assert_eq!(merged, defaults);
        assert_eq!(merge_headers(&merged, &HeaderMap::new()), defaults);
    }

    #[test]
    fn conflicting_key_takes_per_call_value() {
        let mut overrides = HeaderMap::new();
        overrides.insert("content-type", HeaderValue::from_static("text/plain"));
        overrides.insert(ACCEPT, HeaderValue::from_static("text/csv"));

        let merged = merge_headers(&default_headers(), &overrides);
        assert_eq!(merged.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(merged.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(merged.get(ACCEPT).unwrap(), "text/csv");
    }

    #[test]
    fn bearer_value_is_prefixed_and_sensitive() {
        let value = bearer_value("abc").unwrap();
        assert_eq!(value, "Bearer abc");
        assert!(value.is_sensitive());
        assert!(bearer_value("line\nbreak").is_err());
    }
}
