//! Model routing table.
//!
//! Maps a caller-facing model name (the `model` field of a chat request) to
//! the agent that should answer it and an optional sub-model override passed
//! through to that agent.
//!
//! The table is built once at startup and never mutated. A deployment
//! dedicated to one agent can set a forced agent: every route then resolves
//! to that agent with the sub-model override cleared.

use crate::core::error::DomainError;
use serde::Serialize;

/// One entry of the routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoute {
    /// Caller-facing model name, e.g. `claude-code-opus`.
    pub id: String,
    /// Agent identifier passed to the invoker, e.g. `claude`.
    pub agent: String,
    /// Sub-model override for the agent, e.g. `opus`.
    pub model: Option<String>,
    /// Organisation shown by `/v1/models`.
    pub owned_by: String,
    /// Whether `/v1/models` lists this entry (aliases are usually hidden).
    pub listed: bool,
}

impl ModelRoute {
    pub fn new(id: impl Into<String>, agent: impl Into<String>, owned_by: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            agent: agent.into(),
            model: None,
            owned_by: owned_by.into(),
            listed: true,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn unlisted(mut self) -> Self {
        self.listed = false;
        self
    }
}

/// Where a request should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub agent: String,
    pub model: Option<String>,
}

/// Entry of the `GET /v1/models` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCard {
    pub id: String,
    pub object: &'static str,
    pub owned_by: String,
}

/// Immutable model → agent routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    routes: Vec<ModelRoute>,
    forced_agent: Option<String>,
}

impl RoutingTable {
    /// Build a table, rejecting empty or duplicate ids and empty agents.
    pub fn new(routes: Vec<ModelRoute>) -> Result<Self, DomainError> {
        for (index, route) in routes.iter().enumerate() {
            if route.id.trim().is_empty() {
                return Err(DomainError::InvalidRoute(format!(
                    "route #{index} has an empty model id"
                )));
            }
            if route.agent.trim().is_empty() {
                return Err(DomainError::InvalidRoute(format!(
                    "model '{}' has an empty agent",
                    route.id
                )));
            }
            if routes[..index].iter().any(|other| other.id == route.id) {
                return Err(DomainError::InvalidRoute(format!(
                    "model '{}' is defined more than once",
                    route.id
                )));
            }
        }
        Ok(Self {
            routes,
            forced_agent: None,
        })
    }

    /// Force every resolution to `agent` (ignored when blank).
    pub fn with_forced_agent(mut self, agent: Option<String>) -> Self {
        self.forced_agent = agent.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn forced_agent(&self) -> Option<&str> {
        self.forced_agent.as_deref()
    }

    /// Resolve a model name, applying the forced agent if configured.
    ///
    /// Unknown model names are an error even when an agent is forced.
    pub fn resolve(&self, model: &str) -> Result<ResolvedRoute, DomainError> {
        let route = self
            .routes
            .iter()
            .find(|route| route.id == model)
            .ok_or_else(|| DomainError::UnknownModel(model.to_string()))?;

        Ok(match &self.forced_agent {
            Some(agent) => ResolvedRoute {
                agent: agent.clone(),
                model: None,
            },
            None => ResolvedRoute {
                agent: route.agent.clone(),
                model: route.model.clone(),
            },
        })
    }

    pub fn routes(&self) -> &[ModelRoute] {
        &self.routes
    }

    /// Listed models, in table order.
    pub fn model_cards(&self) -> Vec<ModelCard> {
        self.routes
            .iter()
            .filter(|route| route.listed)
            .map(|route| ModelCard {
                id: route.id.clone(),
                object: "model",
                owned_by: route.owned_by.clone(),
            })
            .collect()
    }
}

/// The built-in routes for the agents the `agent-call` wrapper supports.
pub fn default_routes() -> Vec<ModelRoute> {
    vec![
        ModelRoute::new("claude-code", "claude", "anthropic"),
        ModelRoute::new("claude-code-opus", "claude", "anthropic").with_model("opus"),
        ModelRoute::new("claude-code-sonnet", "claude", "anthropic").with_model("sonnet"),
        ModelRoute::new("amazon-q", "amazonq", "amazon"),
        ModelRoute::new("amazonq", "amazonq", "amazon").unlisted(),
        ModelRoute::new("codex", "codex", "openai"),
        ModelRoute::new("aider", "aider", "aider"),
        ModelRoute::new("aider-gpt4", "aider", "aider").with_model("gpt-4"),
        ModelRoute::new("aider-claude", "aider", "aider").with_model("claude-3-opus-20240229"),
    ]
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self {
            routes: default_routes(),
            forced_agent: None,
        }
    }
}
