//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`SessionConfig`]: per-call defaults for the agent daemon session
//! - [`GatewayConfig`]: routing, auth and invocation bounds for chat completions

pub mod gateway_config;
pub mod session_config;

pub use gateway_config::{DEFAULT_MODEL, GatewayConfig};
pub use session_config::SessionConfig;
