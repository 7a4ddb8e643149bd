use serde::{Deserialize, Serialize};

/// Tweaks map: component name → parameter override(s).
///
/// Later inserts for the same top-level key overwrite earlier ones;
/// independent keys coexist.
pub type Tweaks = serde_json::Map<String, serde_json::Value>;

/// Input type selector for a flow run.
///
/// The server validates this value, not the client: unrecognized strings are
/// forwarded verbatim via `Other` and rejected server-side with a 422.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputType {
    Chat,
    Text,
    /// Passthrough for values this library doesn't recognize.
    Other(String),
}

impl InputType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Chat => "chat",
            Self::Text => "text",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl Serialize for InputType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InputType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "chat" => Self::Chat,
            "text" => Self::Text,
            _ => Self::Other(s),
        })
    }
}

impl From<&str> for InputType {
    fn from(s: &str) -> Self {
        match s {
            "chat" => Self::Chat,
            "text" => Self::Text,
            _ => Self::Other(s.to_string()),
        }
    }
}

/// Output type selector for a flow run. Same passthrough semantics as
/// [`InputType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutputType {
    Chat,
    Text,
    Debug,
    Other(String),
}

impl OutputType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Chat => "chat",
            Self::Text => "text",
            Self::Debug => "debug",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl Serialize for OutputType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OutputType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "chat" => Self::Chat,
            "text" => Self::Text,
            "debug" => Self::Debug,
            _ => Self::Other(s),
        })
    }
}

impl From<&str> for OutputType {
    fn from(s: &str) -> Self {
        match s {
            "chat" => Self::Chat,
            "text" => Self::Text,
            "debug" => Self::Debug,
            _ => Self::Other(s.to_string()),
        }
    }
}

/// Per-run options for `Flow::run_with` / `Flow::stream_with`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_type: InputType,
    pub output_type: OutputType,
    /// Correlates conversation turns server-side; passed through verbatim.
    pub session_id: Option<String>,
    /// Per-run tweaks, shallow-merged over the flow's own tweaks.
    pub tweaks: Option<Tweaks>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            input_type: InputType::Chat,
            output_type: OutputType::Chat,
            session_id: None,
            tweaks: None,
        }
    }
}

impl RunOptions {
    /// Builder-style setter for input_type.
    pub fn input_type(mut self, input_type: impl Into<InputType>) -> Self {
        self.input_type = input_type.into();
        self
    }

    /// Builder-style setter for output_type.
    pub fn output_type(mut self, output_type: impl Into<OutputType>) -> Self {
        self.output_type = output_type.into();
        self
    }

    /// Builder-style setter for session_id.
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Add a single tweak. Repeated calls for the same key overwrite.
    pub fn tweak(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.tweaks
            .get_or_insert_with(Tweaks::new)
            .insert(key.into(), value.into());
        self
    }
}

/// The wire-format body for a flow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowRequest {
    pub input_value: String,
    pub input_type: InputType,
    pub output_type: OutputType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweaks: Option<Tweaks>,
}

impl FlowRequest {
    /// Pure transform from caller input to the wire body.
    ///
    /// Flow-level tweaks come first; per-run tweaks shallow-merge on top and
    /// win on key collision. An empty merged map is omitted from the body.
    pub fn new(input_value: impl Into<String>, options: &RunOptions, flow_tweaks: &Tweaks) -> Self {
        let mut merged = flow_tweaks.clone();
        if let Some(run_tweaks) = &options.tweaks {
            for (key, value) in run_tweaks {
                merged.insert(key.clone(), value.clone());
            }
        }
        Self {
            input_value: input_value.into(),
            input_type: options.input_type.clone(),
            output_type: options.output_type.clone(),
            session_id: options.session_id.clone(),
            tweaks: if merged.is_empty() { None } else { Some(merged) },
        }
    }
}
