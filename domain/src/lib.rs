//! Domain layer for agent-gateway
//!
//! This crate contains the core protocol logic and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session protocol
//!
//! A long-running agent daemon is driven over a pair of byte channels that
//! carry newline-delimited JSON [`Envelope`]s. A **turn** starts with one
//! submitted `user` envelope and ends at the first terminal envelope
//! (`result` or `error`). The [`ResponseAggregator`] reduces a turn to the
//! answer text.
//!
//! ## Chat translation
//!
//! An OpenAI-style [`ChatCompletionRequest`] is routed through the
//! [`RoutingTable`] to an agent, flattened into one prompt, and the agent's
//! answer is returned as a [`ChatCompletion`] or as synthetic stream frames.

pub mod chat;
pub mod config;
pub mod core;
pub mod routing;
pub mod session;

// Re-export commonly used types
pub use chat::{
    prompt::{extract_json_schema, flatten_messages},
    request::{ChatCompletionRequest, ChatMessage, JsonSchemaFormat, MessageContent, ResponseFormat},
    response::{ChatCompletion, Usage},
    stream::{ChatCompletionChunk, STREAM_CHUNK_CHARS, StreamFrame, synthesize_stream},
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{error::DomainError, string::preview};
pub use routing::table::{ModelCard, ModelRoute, ResolvedRoute, RoutingTable, default_routes};
pub use session::{
    aggregate::{ResponseAggregator, aggregate},
    envelope::{CLEAR_COMMAND, Envelope, EnvelopeKind, UserEnvelope},
    framing::LineFramer,
    prompt::wrap_one_shot,
    turn::{TurnProgress, TurnTracker},
};
