//! Response body parsing keyed on content type.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Parse a raw response body according to its `Content-Type`.
///
/// JSON types yield structured data (an unparseable or empty JSON body is
/// logged and treated as no body). `text/*` yields a string. Anything else
/// yields no payload.
pub fn parse_body(content_type: Option<&str>, bytes: &[u8]) -> Option<Value> {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if is_json(&essence) {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Failed to parse JSON response body, treating as empty");
                None
            }
        }
    } else if essence.starts_with("text/") {
        Some(Value::String(String::from_utf8_lossy(bytes).into_owned()))
    } else {
        None
    }
}

fn is_json(essence: &str) -> bool {
    essence == "application/json" || essence.ends_with("+json")
}

/// Pull a human-readable message out of a parsed body: `message`, else `error`.
pub fn message_from_body(body: Option<&Value>) -> Option<String> {
    let body = body?;
    ["message", "error"].iter().find_map(|field| {
        body.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Convert a parsed body into the caller's payload type.
///
/// A body that does not fit `T` is logged and treated as empty, mirroring the
/// malformed-JSON policy.
pub fn decode_payload<T: DeserializeOwned>(body: Value) -> Option<T> {
    match serde_json::from_value(body) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!(
                error = %e,
                target_type = std::any::type_name::<T>(),
                "Response payload did not match expected shape, treating as empty"
            );
            None
        }
    }
}
