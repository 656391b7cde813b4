//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;
use thiserror::Error;

/// Prefix of environment overrides, e.g. `AGENT_GATEWAY_SERVER__PORT`.
pub const ENV_PREFIX: &str = "AGENT_GATEWAY_";

const PROJECT_FILES: [&str; 2] = ["agent-gateway.toml", ".agent-gateway.toml"];

/// Short environment names and the keys they set. Values are taken verbatim.
const STRING_ALIASES: [(&str, &str); 2] = [
    ("KEY", "server.api_key"),
    ("FORCE_AGENT", "server.force_agent"),
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `AGENT_GATEWAY_KEY`, `AGENT_GATEWAY_FORCE_AGENT`,
    ///    `AGENT_GATEWAY_<SECTION>__<KEY>`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./agent-gateway.toml` or `./.agent-gateway.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/agent-gateway/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::Invalid(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load only default configuration plus environment (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, ConfigError> {
        Self::with_env(Figment::new().merge(Serialized::defaults(FileConfig::default())))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Layer environment overrides on top of `figment`.
    fn with_env(figment: Figment) -> Figment {
        let mut figment = figment.merge(Self::env_provider());
        for (name, key) in STRING_ALIASES {
            if let Ok(value) = std::env::var(format!("{ENV_PREFIX}{name}")) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment
    }

    /// Nested environment overrides: `AGENT_GATEWAY_<SECTION>__<KEY>`.
    ///
    /// `AGENT_GATEWAY_KEY` and `AGENT_GATEWAY_FORCE_AGENT` are excluded here
    /// and merged as plain strings, so a numeric token stays a string.
    pub fn env_provider() -> Env {
        Env::prefixed(ENV_PREFIX)
            .filter(|key| {
                !STRING_ALIASES
                    .iter()
                    .any(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            })
            .map(|key| key.as_str().replace("__", ".").into())
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/agent-gateway/config.toml` (or the platform
    /// equivalent).
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("agent-gateway").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        let env_vars: Vec<String> = std::env::vars()
            .map(|(name, _)| name)
            .filter(|name| name.starts_with(ENV_PREFIX))
            .collect();
        if env_vars.is_empty() {
            println!("  [     ] Env:     {}*", ENV_PREFIX);
        } else {
            println!("  [FOUND] Env:     {}", env_vars.join(", "));
        }

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{mark:<5}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./agent-gateway.toml or ./.agent-gateway.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
