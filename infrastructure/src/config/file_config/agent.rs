//! Agent helper configuration from TOML (`[agent]` section)

use agent_gateway_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw configuration of the one-shot agent helper used by the gateway
///
/// # Example
///
/// ```toml
/// [agent]
/// program = "agent-call"     # resolved through PATH unless absolute
/// work_dir = "."             # used when a request has no `context`
/// timeout_secs = 300
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub program: String,
    pub work_dir: String,
    pub timeout_secs: u64,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            program: "agent-call".to_string(),
            work_dir: ".".to_string(),
            timeout_secs: 300,
        }
    }
}

impl FileAgentConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.timeout_secs == 0 {
            return vec![ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout {
                    field: "agent.timeout_secs".to_string(),
                },
                "agent.timeout_secs must be greater than 0",
            )];
        }
        vec![]
    }
}
