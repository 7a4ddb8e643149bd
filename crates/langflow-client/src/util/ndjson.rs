// Incremental decoder for newline-delimited JSON event streams.

use langflow_types::Error;
use serde_json::Value;

/// Incremental parser for the server's streamed records.
///
/// Feed chunks of text via `feed()` and receive complete JSON records. A
/// record is one line; lines split across chunk boundaries are buffered
/// until the terminating newline arrives, so no record is dropped or
/// duplicated at a boundary. Handles CRLF, blank lines (skipped), SSE-style
/// `data:` prefixes, and `:` comment lines (skipped).
///
/// A line that is not valid JSON is surfaced as an `Err(Decode)` item in
/// feed order, never silently skipped, and decoding continues with the
/// next line.
pub struct NdjsonDecoder {
    /// Buffer for an incomplete line spanning chunk boundaries.
    buffer: String,
}

impl Default for NdjsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Feed a chunk of text. Returns the records completed by this chunk.
    pub fn feed(&mut self, chunk: &str) -> Vec<Result<Value, Error>> {
        self.buffer.push_str(chunk);
        let mut records = Vec::new();

        loop {
            let Some(pos) = self.buffer.find('\n') else {
                break; // No complete line yet, wait for more data
            };
            let line_end = if pos > 0 && self.buffer.as_bytes()[pos - 1] == b'\r' {
                pos - 1
            } else {
                pos
            };
            let line = self.buffer[..line_end].to_string();
            self.buffer.drain(..=pos);

            if let Some(record) = Self::decode_line(&line) {
                records.push(record);
            }
        }

        records
    }

    /// Flush a trailing record left unterminated when the transport closes.
    pub fn finish(&mut self) -> Option<Result<Value, Error>> {
        let line = std::mem::take(&mut self.buffer);
        Self::decode_line(&line)
    }

    fn decode_line(line: &str) -> Option<Result<Value, Error>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(':') {
            return None;
        }
        // Tolerate SSE-framed payloads: strip the field name, then an
        // optional single space.
        let payload = match line.strip_prefix("data:") {
            Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
            None => line,
        };
        if payload.is_empty() {
            return None;
        }
        Some(
            serde_json::from_str(payload)
                .map_err(|e| Error::decode(format!("invalid stream record: {e}"))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langflow_types::ErrorKind;

    #[test]
    fn test_single_record() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.feed("{\"event\":\"end\",\"data\":{}}\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap()["event"], "end");
    }

    #[test]
    fn test_multiple_records_in_one_chunk() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.feed("{\"a\":1}\n{\"a\":2}\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap()["a"], 1);
        assert_eq!(records[1].as_ref().unwrap()["a"], 2);
    }

    #[test]
    fn test_partial_record_buffered_across_chunks() {
        let mut decoder = NdjsonDecoder::new();
        assert!(decoder.feed("{\"event\":\"add_").is_empty());
        assert!(decoder.feed("message\"").is_empty());
        let records = decoder.feed("}\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap()["event"], "add_message");
    }

    #[test]
    fn test_no_duplicate_across_boundary() {
        let mut decoder = NdjsonDecoder::new();
        let first = decoder.feed("{\"n\":1}\n{\"n\":");
        assert_eq!(first.len(), 1);
        let second = decoder.feed("2}\n");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].as_ref().unwrap()["n"], 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.feed("{\"x\":true}\r\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap()["x"], true);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.feed("\n\n{\"x\":1}\n\n");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_sse_data_prefix_stripped() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.feed("data: {\"event\":\"end\"}\n\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap()["event"], "end");
    }

    #[test]
    fn test_sse_comment_lines_skipped() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.feed(": keep-alive\n{\"x\":1}\n");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_malformed_line_surfaces_decode_error_then_continues() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.feed("not json at all\n{\"x\":1}\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap_err().kind, ErrorKind::Decode);
        assert_eq!(records[1].as_ref().unwrap()["x"], 1);
    }

    #[test]
    fn test_finish_flushes_unterminated_record() {
        let mut decoder = NdjsonDecoder::new();
        assert!(decoder.feed("{\"event\":\"end\"}").is_empty());
        let tail = decoder.finish().unwrap();
        assert_eq!(tail.unwrap()["event"], "end");
    }

    #[test]
    fn test_finish_on_empty_buffer_is_none() {
        let mut decoder = NdjsonDecoder::new();
        decoder.feed("{\"x\":1}\n");
        assert!(decoder.finish().is_none());
    }
}
