//! Infrastructure layer for agent-gateway
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod invoker;
pub mod logging;
#[cfg(unix)]
pub mod session;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileAgentConfig, FileConfig, FileLoggingConfig, FileModelEntry,
    FileServerConfig, FileSessionConfig,
};
pub use invoker::AgentCallInvoker;
pub use logging::JsonlConversationLogger;
#[cfg(unix)]
pub use session::{EnvelopeReader, FifoChannel};
