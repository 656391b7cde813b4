//! Session configuration from TOML (`[session]` section)

use agent_gateway_application::SessionConfig;
use agent_gateway_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw agent-daemon session configuration from TOML
///
/// # Example
///
/// ```toml
/// [session]
/// fifo_in = "/tmp/agent-in"      # daemon reads prompts here
/// fifo_out = "/tmp/agent-out"    # daemon writes envelopes here
/// timeout_secs = 120
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    pub fifo_in: PathBuf,
    pub fifo_out: PathBuf,
    pub timeout_secs: u64,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            fifo_in: PathBuf::from("/tmp/agent-in"),
            fifo_out: PathBuf::from("/tmp/agent-out"),
            timeout_secs: 120,
        }
    }
}

impl FileSessionConfig {
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig::default().with_timeout(Duration::from_secs(self.timeout_secs))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.timeout_secs == 0 {
            return vec![ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout {
                    field: "session.timeout_secs".to_string(),
                },
                "session.timeout_secs must be greater than 0",
            )];
        }
        vec![]
    }
}
