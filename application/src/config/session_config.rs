//! Session parameters: defaults for one call to the agent daemon.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Defaults applied to [`CallAgentInput`](crate::use_cases::call_agent::CallAgentInput)
/// when the caller does not override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Silence allowed on the outbound channel before the turn times out.
    pub timeout: Duration,
    /// Reset the daemon's context after each call.
    pub clear: bool,
    /// Append the one-shot instruction block to prompts.
    pub wrap_prompt: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            clear: true,
            wrap_prompt: true,
        }
    }
}

impl SessionConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn with_wrap_prompt(mut self, wrap: bool) -> Self {
        self.wrap_prompt = wrap;
        self
    }
}
