//! Agent invoker port
//!
//! Defines the interface for running an agent once, synchronously, as a
//! bounded external call. Used by the chat-completion gateway; it does not
//! touch the persistent session channel.

use async_trait::async_trait;
use std::time::Duration;

/// Default upper bound for one agent invocation.
pub const DEFAULT_INVOCATION_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything the invoker needs to run the agent once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInvocation {
    pub prompt: String,
    /// Agent identifier, e.g. `claude`, `codex`.
    pub agent: String,
    /// Optional sub-model override for the agent.
    pub model: Option<String>,
    /// Working directory for the agent.
    pub context: Option<String>,
    /// Serialized JSON schema the answer must follow.
    pub json_schema: Option<String>,
    pub timeout: Duration,
}

impl AgentInvocation {
    pub fn new(prompt: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            agent: agent.into(),
            model: None,
            context: None,
            json_schema: None,
            timeout: DEFAULT_INVOCATION_TIMEOUT,
        }
    }
}

/// How an invocation ended.
///
/// Failures are values, not errors: the gateway embeds them in an otherwise
/// successful completion so API consumers always receive a completion shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Exit status zero; holds stdout.
    Completed(String),
    /// Non-zero exit; holds stderr.
    Failed { exit_code: Option<i32>, stderr: String },
    /// The hard timeout fired and the process was killed.
    TimedOut,
    /// The process could not be started.
    SpawnFailed(String),
}

impl InvocationOutcome {
    /// The completion text for this outcome.
    pub fn into_text(self) -> String {
        match self {
            InvocationOutcome::Completed(stdout) => stdout.trim().to_string(),
            InvocationOutcome::Failed { stderr, .. } => {
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    "Error: Agent execution failed".to_string()
                } else {
                    format!("Error: {stderr}")
                }
            }
            InvocationOutcome::TimedOut => "Error: Agent execution timed out".to_string(),
            InvocationOutcome::SpawnFailed(message) => format!("Error: {message}"),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Completed(_))
    }
}

/// Runs an agent once and reports how it ended.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, invocation: &AgentInvocation) -> InvocationOutcome;
}
