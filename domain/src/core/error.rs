//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("messages field required")]
    EmptyMessages,

    #[error("Invalid route: {0}")]
    InvalidRoute(String),
}
