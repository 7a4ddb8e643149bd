// Unified error type for the entire library.

use serde::{Deserialize, Serialize};

/// Discriminator covering every failure mode the SDK can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    // Server errors (from HTTP responses)
    Authentication,
    AccessDenied,
    NotFound,
    InvalidRequest,
    Server,

    // Client-side errors
    RequestTimeout,
    Network,
    Stream,
    Decode,
    Configuration,
}

impl ErrorKind {
    /// Returns `true` if this error originated from a non-2xx HTTP response.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication
                | Self::AccessDenied
                | Self::NotFound
                | Self::InvalidRequest
                | Self::Server
        )
    }
}

/// The single error type for the entire library.
///
/// Server errors keep the HTTP status and the raw response body so callers
/// can pattern-match (e.g. on the literal "422" in the rendered message).
#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    /// HTTP status code, present on server errors.
    pub status_code: Option<u16>,
    /// Raw server response body, present when it could be parsed as JSON.
    pub raw: Option<serde_json::Value>,
}

impl Error {
    /// Construct from a non-2xx HTTP status and the server's message body.
    pub fn from_http_status(status: u16, message: String, raw: Option<serde_json::Value>) -> Self {
        let kind = match status {
            400 | 422 => ErrorKind::InvalidRequest,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::AccessDenied,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::RequestTimeout,
            _ => ErrorKind::Server,
        };
        Self {
            kind,
            message,
            source: None,
            status_code: Some(status),
            raw,
        }
    }

    /// Convenience: configuration error (bad builder input, missing env var).
    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Configuration,
            message: message.into(),
            source: None,
            status_code: None,
            raw: None,
        }
    }

    /// Convenience: network error with source.
    pub fn network(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: message.into(),
            source: Some(Box::new(source)),
            status_code: None,
            raw: None,
        }
    }

    /// Convenience: mid-stream read failure with source.
    pub fn stream(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ErrorKind::Stream,
            message: message.into(),
            source: Some(Box::new(source)),
            status_code: None,
            raw: None,
        }
    }

    /// Convenience: malformed record or unexpected response shape.
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Decode,
            message: message.into(),
            source: None,
            status_code: None,
            raw: None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The status code is part of the rendered text so callers can match
        // on e.g. "422" without digging into the struct.
        match self.status_code {
            Some(status) => write!(f, "{:?}: HTTP {}: {}", self.kind, status, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
