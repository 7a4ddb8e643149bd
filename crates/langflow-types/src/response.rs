use serde_json::Value;

use crate::error::Error;

/// Immutable wrapper over a completed (non-streamed) run result.
///
/// `outputs` holds the raw nested component run results exactly as the
/// server returned them, in server order. Accessors derive views without
/// mutating or re-sorting the source structure.
#[derive(Debug, Clone)]
pub struct FlowResponse {
    pub session_id: Option<String>,
    pub outputs: Vec<Value>,
}

impl FlowResponse {
    /// Parse the server's run-result JSON.
    ///
    /// Fails with a `Decode` error when the body is not an object carrying an
    /// `outputs` array, rather than letting an indexing fault surface later.
    pub fn from_json(body: Value) -> Result<Self, Error> {
        let obj = body
            .as_object()
            .ok_or_else(|| Error::decode("run response body is not a JSON object"))?;
        let outputs = obj
            .get("outputs")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| Error::decode("run response body has no `outputs` array"))?;
        let session_id = obj
            .get("session_id")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(Self { session_id, outputs })
    }

    /// Every chat text fragment in the output graph, in server order.
    ///
    /// A run can produce multiple messages (e.g. the echoed user input plus
    /// the AI response); all fragments are exposed, not just the first. For
    /// each component output the `results.message.text` field is preferred,
    /// falling back to the `messages[].message` list the server attaches.
    pub fn chat_output_texts(&self) -> Vec<String> {
        let mut texts = Vec::new();
        for run in &self.outputs {
            let Some(components) = run.get("outputs").and_then(Value::as_array) else {
                continue;
            };
            for component in components {
                if let Some(text) = component
                    .pointer("/results/message/text")
                    .and_then(Value::as_str)
                {
                    texts.push(text.to_string());
                    continue;
                }
                if let Some(messages) = component.get("messages").and_then(Value::as_array) {
                    for message in messages {
                        if let Some(text) = message.get("message").and_then(Value::as_str) {
                            texts.push(text.to_string());
                        }
                    }
                }
            }
        }
        texts
    }

    /// All chat text fragments joined with newlines.
    ///
    /// Fails with a `Decode` error when the output graph carries no chat
    /// message at all (empty or malformed outputs).
    pub fn chat_output_text(&self) -> Result<String, Error> {
        let texts = self.chat_output_texts();
        if texts.is_empty() {
            return Err(Error::decode(
                "no chat output message found in run response outputs",
            ));
        }
        Ok(texts.join("\n"))
    }
}
