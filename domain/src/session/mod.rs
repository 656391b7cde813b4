//! Agent session protocol domain.
//!
//! - [`envelope::Envelope`]: one line-framed JSON message and its typed kind
//! - [`framing::LineFramer`]: byte buffer that yields complete lines
//! - [`turn::TurnTracker`]: decides when a turn has ended
//! - [`aggregate::ResponseAggregator`]: reduces a turn to its answer text
//! - [`prompt::wrap_one_shot`]: non-interactive instruction wrapper

pub mod aggregate;
pub mod envelope;
pub mod framing;
pub mod prompt;
pub mod turn;
