//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod call_agent;
pub mod complete_chat;
pub mod turn;
