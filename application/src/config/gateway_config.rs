//! Gateway configuration: routing and request policy for chat completions.
//!
//! Built once at startup and shared read-only (`Arc<GatewayConfig>`) by every
//! request handler.

use crate::ports::agent_invoker::DEFAULT_INVOCATION_TIMEOUT;
use agent_gateway_domain::RoutingTable;
use std::time::Duration;

/// Model used when a request omits `model`.
pub const DEFAULT_MODEL: &str = "claude-code";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub routing: RoutingTable,
    /// Fallback for requests without a `model` field.
    pub default_model: String,
    /// Bearer token required on chat requests. `None` disables auth.
    pub api_key: Option<String>,
    /// Upper bound for one agent invocation.
    pub invocation_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            routing: RoutingTable::default(),
            default_model: DEFAULT_MODEL.to_string(),
            api_key: None,
            invocation_timeout: DEFAULT_INVOCATION_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    // ==================== Builder Methods ====================

    pub fn with_routing(mut self, routing: RoutingTable) -> Self {
        self.routing = routing;
        self
    }

    /// Require `Authorization: Bearer <key>` (blank keys disable auth).
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_invocation_timeout(mut self, timeout: Duration) -> Self {
        self.invocation_timeout = timeout;
        self
    }

    // ==================== Queries ====================

    pub fn requires_auth(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check an `Authorization` header value against the configured key.
    ///
    /// Always true when no key is configured. The comparison is exact: the
    /// header must be `Bearer ` followed by the key.
    pub fn authorize(&self, authorization: Option<&str>) -> bool {
        let Some(expected) = &self.api_key else {
            return true;
        };
        authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_allows_everything() {
        let config = GatewayConfig::default();
        assert!(!config.requires_auth());
        assert!(config.authorize(None));
        assert!(config.authorize(Some("Bearer whatever")));
    }

    #[test]
    fn key_requires_exact_bearer_token() {
        let config = GatewayConfig::default().with_api_key(Some("s3cret".to_string()));
        assert!(config.requires_auth());
        assert!(config.authorize(Some("Bearer s3cret")));
        assert!(!config.authorize(None));
        assert!(!config.authorize(Some("s3cret")));
        assert!(!config.authorize(Some("Bearer s3cret ")));
        assert!(!config.authorize(Some("bearer s3cret")));
        assert!(!config.authorize(Some("Bearer other")));
    }

    #[test]
    fn blank_key_disables_auth() {
        let config = GatewayConfig::default().with_api_key(Some(String::new()));
        assert!(!config.requires_auth());
    }

    #[test]
    fn defaults_route_claude_code() {
        let config = GatewayConfig::default();
        assert_eq!(config.default_model, "claude-code");
        assert_eq!(config.invocation_timeout, Duration::from_secs(300));
        assert!(config.routing.resolve("claude-code").is_ok());
    }
}
