//! OpenAI-compatible chat-completion request types.

use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /v1/chat/completions`.
///
/// Only the fields the gateway acts on are modelled; anything else a client
/// sends (temperature, max_tokens, ...) is accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionRequest {
    /// Routing key; falls back to the configured default model when absent.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default)]
    pub response_format: Option<ResponseFormat>,
    /// Working directory for the agent (gateway extension).
    #[serde(default)]
    pub context: Option<String>,
}

/// One entry of the `messages` history.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub content: MessageContent,
}

fn default_role() -> String {
    "user".to_string()
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: MessageContent::Text(content.into()),
        }
    }
}

/// Message content: a plain string or a sequence of typed parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<Value>),
    Other(Value),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl MessageContent {
    /// Reduce the content to plain text.
    ///
    /// Part sequences keep `{"type":"text"}` parts and bare strings, joined by
    /// newlines; image and other parts are dropped.
    pub fn to_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(_) if part.get("type").and_then(Value::as_str) == Some("text") => {
                        Some(
                            part.get("text")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                        )
                    }
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
            MessageContent::Other(Value::Null) => String::new(),
            MessageContent::Other(value) => value.to_string(),
        }
    }
}

/// The `response_format` request field.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub json_schema: Option<JsonSchemaFormat>,
}

/// The `response_format.json_schema` object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonSchemaFormat {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub schema: Option<Value>,
}
