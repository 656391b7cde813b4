//! Port for the gateway transcript.
//!
//! The transcript records what crossed the gateway, one event per record:
//! envelopes read from the daemon, the answer a call produced, and each
//! chat-completion request with the completion returned for it. Diagnostics
//! stay on `tracing`.

use serde_json::{Value, json};
use std::time::Duration;

/// What a transcript event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationEventKind {
    /// One envelope received during a call.
    SessionEnvelope,
    /// The aggregated answer of a call.
    SessionResult,
    /// A routed chat-completion request.
    ChatRequest,
    /// The completion returned for a chat request.
    ChatResponse,
}

impl ConversationEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConversationEventKind::SessionEnvelope => "session_envelope",
            ConversationEventKind::SessionResult => "session_result",
            ConversationEventKind::ChatRequest => "chat_request",
            ConversationEventKind::ChatResponse => "chat_response",
        }
    }
}

/// A transcript event: its kind plus a JSON object of event fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    pub kind: ConversationEventKind,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(kind: ConversationEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }

    /// An envelope as received, tagged with the call phase it arrived in.
    pub fn session_envelope(phase: &str, envelope: &Value) -> Self {
        Self::new(
            ConversationEventKind::SessionEnvelope,
            json!({ "phase": phase, "envelope": envelope }),
        )
    }

    pub fn session_result(answer: &str) -> Self {
        Self::new(
            ConversationEventKind::SessionResult,
            json!({ "text": answer, "bytes": answer.len() }),
        )
    }

    /// A request after routing. The prompt is the flattened history.
    pub fn chat_request(
        model: &str,
        agent: &str,
        sub_model: Option<&str>,
        stream: bool,
        prompt: &str,
        has_schema: bool,
    ) -> Self {
        Self::new(
            ConversationEventKind::ChatRequest,
            json!({
                "model": model,
                "agent": agent,
                "sub_model": sub_model,
                "stream": stream,
                "prompt": prompt,
                "json_schema": has_schema,
            }),
        )
    }

    pub fn chat_response(
        id: &str,
        model: &str,
        success: bool,
        content: &str,
        elapsed: Duration,
    ) -> Self {
        Self::new(
            ConversationEventKind::ChatResponse,
            json!({
                "id": id,
                "model": model,
                "success": success,
                "content": content,
                "duration_ms": elapsed.as_millis() as u64,
            }),
        )
    }

    pub fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Sink for transcript events.
///
/// `log` never fails; implementations drop events they cannot write.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
