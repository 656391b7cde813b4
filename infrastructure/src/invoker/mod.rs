//! Agent invocation: one-shot external agent calls for the chat gateway.

mod process;

pub use process::{AgentCallInvoker, DEFAULT_AGENT_PROGRAM};
