use serde::{Deserialize, Serialize};

/// One server log line. Timestamps are Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub timestamp: i64,
    pub message: String,
}

/// Query parameters for `Logs::fetch`.
///
/// `timestamp` anchors the window; `lines_before`/`lines_after` bound how
/// many lines around it are returned. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct LogsQuery {
    pub timestamp: Option<i64>,
    pub lines_before: Option<u32>,
    pub lines_after: Option<u32>,
}

impl LogsQuery {
    /// Builder-style setter for timestamp.
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Builder-style setter for lines_before.
    pub fn lines_before(mut self, lines_before: u32) -> Self {
        self.lines_before = Some(lines_before);
        self
    }

    /// Builder-style setter for lines_after.
    pub fn lines_after(mut self, lines_after: u32) -> Self {
        self.lines_after = Some(lines_after);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_query_default_is_empty() {
        let q = LogsQuery::default();
        assert!(q.timestamp.is_none());
        assert!(q.lines_before.is_none());
        assert!(q.lines_after.is_none());
    }

    #[test]
    fn test_logs_query_builder_chain() {
        let q = LogsQuery::default()
            .timestamp(1719947842453)
            .lines_before(10)
            .lines_after(10);
        assert_eq!(q.timestamp, Some(1719947842453));
        assert_eq!(q.lines_before, Some(10));
        assert_eq!(q.lines_after, Some(10));
    }

    #[test]
    fn test_log_serde_roundtrip() {
        let log = Log {
            timestamp: 1719947842453,
            message: "flow started".into(),
        };
        let json = serde_json::to_string(&log).unwrap();
        let back: Log = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
