//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types once
//! at startup.

mod agent;
mod logging;
mod models;
mod server;
mod session;

pub use agent::FileAgentConfig;
pub use logging::FileLoggingConfig;
pub use models::{FileModelEntry, routing_table, validate_entries};
pub use server::FileServerConfig;
pub use session::FileSessionConfig;

use agent_gateway_application::GatewayConfig;
use agent_gateway_domain::{ConfigIssue, ConfigIssueCode, DomainError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP gateway settings
    pub server: FileServerConfig,
    /// Agent daemon FIFO settings
    pub session: FileSessionConfig,
    /// One-shot agent helper settings
    pub agent: FileAgentConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
    /// Routing table; empty means the built-in table
    pub models: Vec<FileModelEntry>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Server port
    /// 2. Zero timeouts
    /// 3. Routing entries (empty ids/agents, duplicates)
    /// 4. That the default model is routable
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.server.validate());
        issues.extend(self.session.validate());
        issues.extend(self.agent.validate());

        let route_issues = validate_entries(&self.models);
        let routes_valid = route_issues.is_empty();
        issues.extend(route_issues);

        if routes_valid
            && let Ok(table) = routing_table(&self.models, None)
            && table.resolve(&self.server.default_model).is_err()
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownDefaultModel {
                    model: self.server.default_model.clone(),
                },
                format!(
                    "server.default_model '{}' is not in the routing table; requests without a model will be rejected",
                    self.server.default_model
                ),
            ));
        }

        issues
    }

    /// Build the gateway configuration.
    pub fn gateway_config(&self) -> Result<GatewayConfig, DomainError> {
        let routing = routing_table(&self.models, self.server.force_agent())?;
        Ok(GatewayConfig::default()
            .with_routing(routing)
            .with_default_model(&self.server.default_model)
            .with_api_key(self.server.api_key())
            .with_invocation_timeout(Duration::from_secs(self.agent.timeout_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
host = "0.0.0.0"
port = 9000
api_key = "s3cret"
force_agent = ""

[session]
fifo_in = "/run/agent/in"
timeout_secs = 30

[agent]
program = "/usr/local/bin/agent-call"
timeout_secs = 60

[logging]
transcript = "/var/log/agent-gateway.jsonl"

[[models]]
id = "fast"
agent = "claude"
model = "haiku"
owned_by = "anthropic"

[[models]]
id = "hidden"
agent = "codex"
listed = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.api_key().as_deref(), Some("s3cret"));
        assert_eq!(config.server.force_agent(), None);
        assert_eq!(config.session.fifo_in.to_str(), Some("/run/agent/in"));
        assert_eq!(config.session.fifo_out.to_str(), Some("/tmp/agent-out"));
        assert_eq!(config.agent.work_dir, ".");
        assert!(config.logging.transcript.is_some());
        assert_eq!(config.models.len(), 2);
        assert!(config.models[0].listed);
        assert!(!config.models[1].listed);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.default_model, "claude-code");
        assert_eq!(config.session.timeout_secs, 120);
        assert_eq!(config.agent.program, "agent-call");
        assert_eq!(config.agent.timeout_secs, 300);
        assert!(config.models.is_empty());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_unknown_default_model() {
        let config: FileConfig = toml::from_str(
            r#"
[[models]]
id = "only"
agent = "claude"
"#,
        )
        .unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::UnknownDefaultModel { .. }
        ));
    }

    #[test]
    fn test_validate_collects_errors() {
        let config: FileConfig = toml::from_str(
            r#"
[server]
port = 0
[session]
timeout_secs = 0
"#,
        )
        .unwrap();
        let errors = config.validate().into_iter().filter(|i| i.is_error()).count();
        assert_eq!(errors, 2);
    }

    #[test]
    fn test_gateway_config_conversion() {
        let config: FileConfig = toml::from_str(
            r#"
[server]
api_key = "k"
force_agent = "aider"
[agent]
timeout_secs = 10
"#,
        )
        .unwrap();
        let gateway = config.gateway_config().unwrap();
        assert_eq!(gateway.api_key.as_deref(), Some("k"));
        assert_eq!(gateway.invocation_timeout, Duration::from_secs(10));
        assert_eq!(gateway.routing.forced_agent(), Some("aider"));
    }

    #[test]
    fn test_session_config_conversion() {
        let config: FileConfig = toml::from_str("[session]\ntimeout_secs = 7\n").unwrap();
        let session = config.session.to_session_config();
        assert_eq!(session.timeout, Duration::from_secs(7));
        assert!(session.clear);
        assert!(session.wrap_prompt);
    }
}
