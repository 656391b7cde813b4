//! Server configuration from TOML (`[server]` section)

use agent_gateway_application::DEFAULT_MODEL;
use agent_gateway_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw HTTP gateway configuration from TOML
///
/// # Example
///
/// ```toml
/// [server]
/// host = "127.0.0.1"
/// port = 8080
/// api_key = ""              # empty: no auth
/// force_agent = ""          # empty: route by model
/// default_model = "claude-code"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token required on `/v1/chat/completions`
    pub api_key: Option<String>,
    /// Send every request to this agent, whatever the model
    pub force_agent: Option<String>,
    /// Model used when a request has no `model` field
    pub default_model: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            api_key: None,
            force_agent: None,
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl FileServerConfig {
    /// The API key, treating an empty string as unset.
    pub fn api_key(&self) -> Option<String> {
        non_empty(&self.api_key)
    }

    /// The forced agent, treating an empty string as unset.
    pub fn force_agent(&self) -> Option<String> {
        non_empty(&self.force_agent)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.port == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidPort,
                "server.port must not be 0",
            ));
        }
        issues
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
