//! Agent channel port
//!
//! Defines the interface for exchanging protocol envelopes with a running
//! agent daemon over its inbound/outbound channel pair.

use agent_gateway_domain::{Envelope, UserEnvelope};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the agent daemon
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Daemon not running (no {0})")]
    DaemonNotReachable(String),

    #[error("Response timeout after {0:?}")]
    Timeout(Duration),

    #[error("Channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SessionError {
    /// Check if this error is a read timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout(_))
    }
}

/// Lazy sequence of envelopes read during one collection pass.
///
/// Malformed lines never appear here; they are skipped by the transport.
/// A timeout is delivered as an `Err` item and ends the pass.
pub type EnvelopeStream = BoxStream<'static, Result<Envelope, SessionError>>;

/// Channel pair to a long-running agent daemon.
///
/// The daemon holds the conversation; the channel carries no session id, so
/// only one turn may be in flight at a time. Callers sharing a daemon must
/// serialize their calls.
#[async_trait]
pub trait AgentChannel: Send + Sync {
    /// Human-readable name of the inbound endpoint (for error messages).
    fn endpoint(&self) -> String;

    /// Whether the inbound endpoint exists, i.e. a daemon is listening.
    fn is_reachable(&self) -> bool;

    /// Write one envelope to the agent and flush.
    async fn send(&self, envelope: &UserEnvelope) -> Result<(), SessionError>;

    /// Start a collection pass over the outbound channel.
    ///
    /// `timeout` bounds how long the reader waits for data before yielding
    /// [`SessionError::Timeout`]. The stream does not stop at turn
    /// boundaries; wrap it with
    /// [`take_turn`](crate::use_cases::turn::take_turn) for that.
    async fn receive(&self, timeout: Duration) -> Result<EnvelopeStream, SessionError>;
}
