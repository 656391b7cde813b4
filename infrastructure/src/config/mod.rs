//! Configuration file loading for agent-gateway
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AGENT_GATEWAY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./agent-gateway.toml` or `./.agent-gateway.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/agent-gateway/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAgentConfig, FileConfig, FileLoggingConfig, FileModelEntry, FileServerConfig,
    FileSessionConfig,
};
pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX};
