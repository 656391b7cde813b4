//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string::preview`]: log-safe string truncation

pub mod error;
pub mod string;
