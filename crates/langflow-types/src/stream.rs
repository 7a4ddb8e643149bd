use std::pin::Pin;

use futures_core::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// A boxed stream that is Send.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// One message pushed on an `add_message` event.
///
/// Only `text` is guaranteed by the server; everything else is optional
/// metadata, with unrecognized fields preserved in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One incremental unit of a streamed flow run.
///
/// Tagged variant over the server's `{event, data}` records. Events the
/// library doesn't recognize land in `Unknown` instead of failing the
/// stream (forward compatibility).
#[derive(Debug, Clone)]
pub enum FlowEvent {
    /// A message was added to the conversation (user echo or AI output).
    AddMessage(Box<ChatMessage>),
    /// The run finished; carries the final result payload, if any.
    End(Value),
    /// The server reported an error mid-run; carries the error descriptor.
    Error(Value),
    /// An event type this library doesn't recognize.
    Unknown { event: String, data: Value },
}

impl FlowEvent {
    /// Decode a raw `{event, data}` record.
    ///
    /// Fails with a `Decode` error when the record has no string `event`
    /// field, or when an `add_message` payload lacks the required `text`.
    pub fn from_json(record: Value) -> Result<Self, Error> {
        let obj = record
            .as_object()
            .ok_or_else(|| Error::decode("stream record is not a JSON object"))?;
        let event = obj
            .get("event")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::decode("stream record has no `event` field"))?
            .to_string();
        let data = obj.get("data").cloned().unwrap_or(Value::Null);

        Ok(match event.as_str() {
            "add_message" => {
                let message: ChatMessage = serde_json::from_value(data).map_err(|e| {
                    Error::decode(format!("add_message payload is malformed: {e}"))
                })?;
                Self::AddMessage(Box::new(message))
            }
            "end" => Self::End(data),
            "error" => Self::Error(data),
            _ => Self::Unknown { event, data },
        })
    }

    /// The wire name of this event's type.
    pub fn event_name(&self) -> &str {
        match self {
            Self::AddMessage(_) => "add_message",
            Self::End(_) => "end",
            Self::Error(_) => "error",
            Self::Unknown { event, .. } => event.as_str(),
        }
    }

    /// Whether this event ends the stream (`end` or `error`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End(_) | Self::Error(_))
    }

    /// The message text, for `AddMessage` events.
    pub fn message_text(&self) -> Option<&str> {
        match self {
            Self::AddMessage(message) => Some(message.text.as_str()),
            _ => None,
        }
    }
}

impl Serialize for FlowEvent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("event", self.event_name())?;
        match self {
            Self::AddMessage(message) => map.serialize_entry("data", message)?,
            Self::End(data) | Self::Error(data) | Self::Unknown { data, .. } => {
                map.serialize_entry("data", data)?
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_add_message_event_decodes_payload() {
        let record = json!({
            "event": "add_message",
            "data": {"text": "Your request is: hi", "sender": "Machine", "sender_name": "AI"}
        });
        let event = FlowEvent::from_json(record).unwrap();
        assert_eq!(event.event_name(), "add_message");
        assert_eq!(event.message_text(), Some("Your request is: hi"));
        assert!(!event.is_terminal());
        match event {
            FlowEvent::AddMessage(message) => {
                assert_eq!(message.sender.as_deref(), Some("Machine"));
                assert_eq!(message.sender_name.as_deref(), Some("AI"));
            }
            other => panic!("expected AddMessage, got {other:?}"),
        }
    }

    #[test]
    fn test_add_message_preserves_unknown_payload_fields() {
        let record = json!({
            "event": "add_message",
            "data": {"text": "hi", "flow_id": "f-1", "files": []}
        });
        let event = FlowEvent::from_json(record).unwrap();
        let FlowEvent::AddMessage(message) = event else {
            panic!("expected AddMessage");
        };
        assert_eq!(message.extra["flow_id"], "f-1");
    }

    #[test]
    fn test_end_event_is_terminal() {
        let event = FlowEvent::from_json(json!({"event": "end", "data": {"result": {}}})).unwrap();
        assert!(event.is_terminal());
        assert_eq!(event.event_name(), "end");
        assert!(event.message_text().is_none());
    }

    #[test]
    fn test_error_event_is_terminal_and_keeps_descriptor() {
        let event =
            FlowEvent::from_json(json!({"event": "error", "data": {"detail": "boom"}})).unwrap();
        assert!(event.is_terminal());
        match event {
            FlowEvent::Error(data) => assert_eq!(data["detail"], "boom"),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_event_falls_back_to_unknown() {
        let event =
            FlowEvent::from_json(json!({"event": "vertices_sorted", "data": {"ids": []}})).unwrap();
        match &event {
            FlowEvent::Unknown { event, .. } => assert_eq!(event, "vertices_sorted"),
            other => panic!("expected Unknown, got {other:?}"),
        }
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_record_without_event_field_is_decode_error() {
        let err = FlowEvent::from_json(json!({"data": {}})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
        assert!(err.message.contains("event"));
    }

    #[test]
    fn test_non_object_record_is_decode_error() {
        let err = FlowEvent::from_json(json!("just a string")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }

    #[test]
    fn test_add_message_without_text_is_decode_error() {
        let err =
            FlowEvent::from_json(json!({"event": "add_message", "data": {"sender": "User"}}))
                .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }

    #[test]
    fn test_missing_data_defaults_to_null() {
        let event = FlowEvent::from_json(json!({"event": "end"})).unwrap();
        match event {
            FlowEvent::End(data) => assert!(data.is_null()),
            other => panic!("expected End, got {other:?}"),
        }
    }

    #[test]
    fn test_serialize_matches_wire_shape() {
        let event = FlowEvent::from_json(json!({
            "event": "add_message",
            "data": {"text": "hi"}
        }))
        .unwrap();
        let wire: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(wire["event"], "add_message");
        assert_eq!(wire["data"]["text"], "hi");
    }
}
