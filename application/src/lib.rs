//! Application layer for agent-gateway
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_MODEL, GatewayConfig, SessionConfig};
pub use ports::{
    agent_channel::{AgentChannel, EnvelopeStream, SessionError},
    agent_invoker::{AgentInvocation, AgentInvoker, DEFAULT_INVOCATION_TIMEOUT, InvocationOutcome},
    conversation_logger::{
        ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
    },
};
pub use use_cases::call_agent::{CLEAR_DRAIN_TIMEOUT, CallAgentInput, CallAgentUseCase, CallPhase};
pub use use_cases::complete_chat::{ChatError, ChatOutput, CompleteChatUseCase, completion_id};
pub use use_cases::turn::{collect_turn, take_turn};
