//! Model routing table from TOML (`[[models]]` entries)

use agent_gateway_domain::{
    ConfigIssue, ConfigIssueCode, DomainError, ModelRoute, RoutingTable, default_routes,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One `[[models]]` entry
///
/// # Example
///
/// ```toml
/// [[models]]
/// id = "claude-code-opus"
/// agent = "claude"
/// model = "opus"
/// owned_by = "anthropic"
///
/// [[models]]
/// id = "amazonq"
/// agent = "q"
/// owned_by = "amazon"
/// listed = false          # accepted, but hidden from /v1/models
/// ```
///
/// When no entries are configured the built-in table is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModelEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub owned_by: String,
    #[serde(default = "default_listed")]
    pub listed: bool,
}

fn default_listed() -> bool {
    true
}

impl From<&FileModelEntry> for ModelRoute {
    fn from(entry: &FileModelEntry) -> Self {
        let mut route = ModelRoute::new(&entry.id, &entry.agent, &entry.owned_by);
        route.model = entry.model.clone().filter(|m| !m.is_empty());
        route.listed = entry.listed;
        route
    }
}

/// Build the routing table, falling back to the built-in routes.
pub fn routing_table(
    entries: &[FileModelEntry],
    force_agent: Option<String>,
) -> Result<RoutingTable, DomainError> {
    let routes = if entries.is_empty() {
        default_routes()
    } else {
        entries.iter().map(ModelRoute::from).collect()
    };
    Ok(RoutingTable::new(routes)?.with_forced_agent(force_agent))
}

/// Report empty ids, empty agents and duplicate ids.
pub fn validate_entries(entries: &[FileModelEntry]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for entry in entries {
        if entry.id.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelId,
                "models: entry with empty id",
            ));
            continue;
        }
        if entry.agent.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyAgent {
                    model: entry.id.clone(),
                },
                format!("models: '{}' has no agent", entry.id),
            ));
        }
        if !seen.insert(entry.id.as_str()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateModel {
                    model: entry.id.clone(),
                },
                format!("models: '{}' is defined more than once", entry.id),
            ));
        }
    }

    issues
}
