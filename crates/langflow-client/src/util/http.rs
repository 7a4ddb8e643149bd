// Shared HTTP utilities.

use langflow_types::Error;

/// Strip trailing slashes so path concatenation stays predictable.
pub fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Build a server `Error` from a non-2xx status and the raw response body.
///
/// Langflow wraps error messages in `{"detail": ...}`; when that path doesn't
/// resolve (or the body isn't JSON at all) the full body is carried verbatim,
/// so the caller always sees what the server actually said.
pub fn error_from_body(status: u16, body: &str) -> Error {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => {
            let message = match json.get("detail") {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(detail) => detail.to_string(),
                None => json.to_string(),
            };
            Error::from_http_status(status, message, Some(json))
        }
        Err(_) => Error::from_http_status(status, body.to_string(), None),
    }
}
