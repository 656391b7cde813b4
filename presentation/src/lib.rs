//! Presentation layer for agent-gateway
//!
//! This crate contains CLI definitions, console output, and the
//! OpenAI-compatible HTTP router.

pub mod cli;
pub mod output;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{CallArgs, Cli, Command, ServeArgs};
pub use output::console::ConsoleFormatter;
pub use server::{ApiError, GatewayState, create_router};
