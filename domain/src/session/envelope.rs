//! Envelope types for the agent session protocol.
//!
//! Every message exchanged with the agent daemon is a single JSON object on
//! its own line, discriminated by a `type` field:
//!
//! - **Outbound** (client → agent): `user`, carrying a prompt or the
//!   [`CLEAR_COMMAND`] control string
//! - **Inbound** (agent → client): `assistant`, `content_block_delta`,
//!   `result`, `error`, plus any number of informational types
//!
//! Inbound envelopes are parsed tolerantly: the typed [`EnvelopeKind`] is
//! what the turn protocol and aggregator match on, while the source JSON
//! value is kept alongside so raw-mode consumers can forward it verbatim.

use serde::Serialize;
use serde_json::Value;

/// Control string that resets the agent's conversational context.
pub const CLEAR_COMMAND: &str = "/clear";

/// Role/content pair carried by a `user` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserMessage {
    pub role: &'static str,
    pub content: String,
}

/// Outbound `user` envelope.
///
/// Serializes to `{"type":"user","message":{"role":"user","content":"..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEnvelope {
    #[serde(rename = "type")]
    kind: &'static str,
    pub message: UserMessage,
}

impl UserEnvelope {
    /// Creates a `user` envelope carrying a prompt.
    pub fn prompt(content: impl Into<String>) -> Self {
        Self {
            kind: "user",
            message: UserMessage {
                role: "user",
                content: content.into(),
            },
        }
    }

    /// Creates the control envelope that resets session context.
    pub fn clear() -> Self {
        Self::prompt(CLEAR_COMMAND)
    }

    /// Returns true if this envelope is the context-reset control message.
    pub fn is_clear(&self) -> bool {
        self.message.content == CLEAR_COMMAND
    }

    /// Encodes the envelope as one protocol line (JSON plus `\n`).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Typed view of an envelope, one variant per `type` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// A `user` message echoed back by the agent.
    User { content: Option<String> },
    /// A full assistant message; `texts` holds its `text` content blocks.
    Assistant { texts: Vec<String> },
    /// An incremental delta; `text` is set only for `text_delta` deltas.
    ContentBlockDelta { text: Option<String> },
    /// Terminal envelope carrying the authoritative final answer.
    Result { result: String },
    /// Terminal envelope signalling failure; the message is informational.
    Error { message: Option<String> },
    /// Any other `type` (system, tool use, usage, ...).
    Other { kind: String },
}

/// An inbound protocol envelope: typed kind plus the raw JSON it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub kind: EnvelopeKind,
    pub raw: Value,
}

impl Envelope {
    /// Parse one protocol line.
    ///
    /// Returns `None` for lines that are not JSON objects; callers skip those.
    pub fn parse_line(line: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(line.trim()).ok()?;
        Self::from_value(value)
    }

    /// Classify an already-decoded JSON value.
    ///
    /// Returns `None` if the value is not a JSON object.
    pub fn from_value(raw: Value) -> Option<Self> {
        let object = raw.as_object()?;
        let type_name = object.get("type").and_then(Value::as_str).unwrap_or("");

        let kind = match type_name {
            "user" => EnvelopeKind::User {
                content: raw
                    .get("message")
                    .and_then(|m| m.get("content"))
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            },
            "assistant" => EnvelopeKind::Assistant {
                texts: assistant_texts(&raw),
            },
            "content_block_delta" => EnvelopeKind::ContentBlockDelta {
                text: delta_text(&raw),
            },
            "result" => EnvelopeKind::Result {
                result: match object.get("result") {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                },
            },
            "error" => EnvelopeKind::Error {
                message: error_message(&raw),
            },
            other => EnvelopeKind::Other {
                kind: other.to_string(),
            },
        };

        Some(Self { kind, raw })
    }

    /// The envelope's `type` string as it appeared on the wire.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            EnvelopeKind::User { .. } => "user",
            EnvelopeKind::Assistant { .. } => "assistant",
            EnvelopeKind::ContentBlockDelta { .. } => "content_block_delta",
            EnvelopeKind::Result { .. } => "result",
            EnvelopeKind::Error { .. } => "error",
            EnvelopeKind::Other { kind } => kind,
        }
    }

    /// Returns true if this envelope ends a turn (`result` or `error`).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EnvelopeKind::Result { .. } | EnvelopeKind::Error { .. }
        )
    }
}

/// Collect the text of every `{"type":"text"}` block in `message.content`.
fn assistant_texts(raw: &Value) -> Vec<String> {
    let Some(blocks) = raw
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .map(|block| {
            block
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

fn delta_text(raw: &Value) -> Option<String> {
    let delta = raw.get("delta")?;
    if delta.get("type").and_then(Value::as_str) != Some("text_delta") {
        return None;
    }
    Some(
        delta
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    )
}

/// Best-effort error text: `error` as string, `error.message`, or `message`.
fn error_message(raw: &Value) -> Option<String> {
    if let Some(s) = raw.get("error").and_then(Value::as_str) {
        return Some(s.to_string());
    }
    if let Some(s) = raw
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return Some(s.to_string());
    }
    raw.get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_envelope_serializes_to_wire_shape() {
        let json = serde_json::to_value(UserEnvelope::prompt("hello")).unwrap();
        assert_eq!(
            json,
            json!({"type": "user", "message": {"role": "user", "content": "hello"}})
        );
    }

    #[test]
    fn clear_envelope_carries_control_string() {
        let envelope = UserEnvelope::clear();
        assert!(envelope.is_clear());
        assert!(!UserEnvelope::prompt("/clearly not").is_clear());
        let line = envelope.to_line().unwrap();
        assert!(line.ends_with('\n'));
        assert!(line.contains(r#""content":"/clear""#));
    }

    #[test]
    fn parse_assistant_collects_text_blocks_only() {
        let envelope = Envelope::parse_line(
            r#"{"type":"assistant","message":{"content":[
                {"type":"text","text":"Hello"},
                {"type":"tool_use","name":"Read"},
                "stray",
                {"type":"text","text":" world"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(
            envelope.kind,
            EnvelopeKind::Assistant {
                texts: vec!["Hello".to_string(), " world".to_string()]
            }
        );
        assert!(!envelope.is_terminal());
    }

    #[test]
    fn parse_assistant_with_string_content_has_no_texts() {
        let envelope =
            Envelope::parse_line(r#"{"type":"assistant","message":{"content":"plain"}}"#)
                .unwrap();
        assert_eq!(envelope.kind, EnvelopeKind::Assistant { texts: vec![] });
    }

    #[test]
    fn parse_delta_only_keeps_text_deltas() {
        let text = Envelope::parse_line(
            r#"{"type":"content_block_delta","delta":{"type":"text_delta","text":"par"}}"#,
        )
        .unwrap();
        assert_eq!(
            text.kind,
            EnvelopeKind::ContentBlockDelta {
                text: Some("par".to_string())
            }
        );

        let json_delta = Envelope::parse_line(
            r#"{"type":"content_block_delta","delta":{"type":"input_json_delta","partial_json":"{"}}"#,
        )
        .unwrap();
        assert_eq!(json_delta.kind, EnvelopeKind::ContentBlockDelta { text: None });
    }

    #[test]
    fn parse_result_variants() {
        let result = Envelope::parse_line(r#"{"type":"result","result":"done"}"#).unwrap();
        assert_eq!(
            result.kind,
            EnvelopeKind::Result {
                result: "done".to_string()
            }
        );
        assert!(result.is_terminal());

        let missing = Envelope::parse_line(r#"{"type":"result","subtype":"success"}"#).unwrap();
        assert_eq!(
            missing.kind,
            EnvelopeKind::Result {
                result: String::new()
            }
        );

        let numeric = Envelope::parse_line(r#"{"type":"result","result":42}"#).unwrap();
        assert_eq!(
            numeric.kind,
            EnvelopeKind::Result {
                result: "42".to_string()
            }
        );
    }

    #[test]
    fn parse_error_is_terminal_with_message() {
        let nested =
            Envelope::parse_line(r#"{"type":"error","error":{"message":"overloaded"}}"#).unwrap();
        assert_eq!(
            nested.kind,
            EnvelopeKind::Error {
                message: Some("overloaded".to_string())
            }
        );
        assert!(nested.is_terminal());

        let bare = Envelope::parse_line(r#"{"type":"error"}"#).unwrap();
        assert_eq!(bare.kind, EnvelopeKind::Error { message: None });
    }

    #[test]
    fn unknown_and_missing_types_are_other() {
        let system = Envelope::parse_line(r#"{"type":"system","subtype":"init"}"#).unwrap();
        assert_eq!(system.type_name(), "system");
        assert!(!system.is_terminal());

        let untyped = Envelope::parse_line(r#"{"hello":"world"}"#).unwrap();
        assert_eq!(
            untyped.kind,
            EnvelopeKind::Other {
                kind: String::new()
            }
        );
    }

    #[test]
    fn malformed_and_non_object_lines_are_rejected() {
        assert!(Envelope::parse_line("not json").is_none());
        assert!(Envelope::parse_line(r#"{"type":"result""#).is_none());
        assert!(Envelope::parse_line("42").is_none());
        assert!(Envelope::parse_line(r#"["type","result"]"#).is_none());
    }

    #[test]
    fn raw_value_is_preserved_verbatim() {
        let line = r#"{"type":"system","session_id":"abc","tools":["Read"]}"#;
        let envelope = Envelope::parse_line(line).unwrap();
        assert_eq!(envelope.raw["session_id"], "abc");
        assert_eq!(envelope.raw["tools"][0], "Read");
    }
}
