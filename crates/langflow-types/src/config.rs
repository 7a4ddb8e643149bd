use serde::{Deserialize, Serialize};

/// Client-level timeout configuration.
///
/// Timeouts are transport configuration, not per-operation knobs: the
/// `reqwest` client is built once from these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientTimeout {
    /// Connection timeout in seconds (default: 10.0).
    pub connect: f64,
    /// Request timeout in seconds (default: 120.0).
    pub request: f64,
    /// Per-chunk stream read timeout in seconds (default: 30.0).
    pub stream_read: f64,
}

impl Default for ClientTimeout {
    fn default() -> Self {
        Self {
            connect: 10.0,
            request: 120.0,
            stream_read: 30.0,
        }
    }
}
