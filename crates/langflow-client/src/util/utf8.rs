// Cross-chunk UTF-8 reassembly for byte streams.

use langflow_types::Error;

/// Reassembles UTF-8 text from raw network chunks.
///
/// `push` yields the longest valid prefix of the accumulated bytes and holds
/// back a multi-byte sequence split at a chunk boundary until its remaining
/// bytes arrive, so no character is ever mangled into a replacement char. A
/// byte sequence that can never become valid UTF-8 is a `Decode` error.
pub struct Utf8Buffer {
    pending: Vec<u8>,
}

impl Default for Utf8Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Utf8Buffer {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Append a chunk and return the decodable text so far.
    pub fn push(&mut self, chunk: &[u8]) -> Result<String, Error> {
        self.pending.extend_from_slice(chunk);
        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                Ok(text)
            }
            Err(e) => {
                // error_len distinguishes "incomplete at the end" (wait for
                // more bytes) from "invalid sequence" (can never decode).
                if e.error_len().is_some() {
                    return Err(Error::decode("stream chunk is not valid UTF-8"));
                }
                let valid_up_to = e.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid_up_to]).into_owned();
                self.pending.drain(..valid_up_to);
                Ok(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langflow_types::ErrorKind;

    #[test]
    fn test_ascii_passes_through() {
        let mut buf = Utf8Buffer::new();
        assert_eq!(buf.push(b"hello").unwrap(), "hello");
        assert_eq!(buf.push(b" world").unwrap(), " world");
    }

    #[test]
    fn test_two_byte_char_split_across_chunks() {
        let mut buf = Utf8Buffer::new();
        let bytes = "caf\u{e9}".as_bytes();
        let first = buf.push(&bytes[..4]).unwrap();
        assert_eq!(first, "caf");
        let second = buf.push(&bytes[4..]).unwrap();
        assert_eq!(second, "\u{e9}");
        assert!(!second.contains('\u{FFFD}'));
    }

    #[test]
    fn test_three_byte_char_split_byte_by_byte() {
        let mut buf = Utf8Buffer::new();
        let bytes = "\u{2014}".as_bytes();
        assert_eq!(bytes.len(), 3);
        assert_eq!(buf.push(&bytes[..1]).unwrap(), "");
        assert_eq!(buf.push(&bytes[1..2]).unwrap(), "");
        let last = buf.push(&bytes[2..]).unwrap();
        assert_eq!(last, "\u{2014}");
        assert!(!last.contains('\u{FFFD}'));
    }

    #[test]
    fn test_split_char_inside_larger_chunks() {
        let mut buf = Utf8Buffer::new();
        let text = "{\"1719947842453\": \"temp\u{e9}rature basse\"}\n";
        let bytes = text.as_bytes();
        // Split in the middle of the two-byte char.
        let split = text.find('\u{e9}').unwrap() + 1;
        let mut out = buf.push(&bytes[..split]).unwrap();
        out.push_str(&buf.push(&bytes[split..]).unwrap());
        assert_eq!(out, text);
    }

    #[test]
    fn test_invalid_sequence_is_decode_error() {
        let mut buf = Utf8Buffer::new();
        let err = buf.push(&[b'o', b'k', 0xFF]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }

    #[test]
    fn test_overlong_continuation_is_decode_error() {
        let mut buf = Utf8Buffer::new();
        // A continuation byte with no leading byte is invalid, not incomplete.
        let err = buf.push(&[0x94]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }
}
