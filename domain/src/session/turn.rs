//! Turn completion tracking.
//!
//! A turn is everything the agent emits in response to one submitted `user`
//! envelope. It ends on the first terminal envelope (`result` or `error`);
//! the only other way out is the transport timing out.

use super::envelope::Envelope;

/// What the caller should do after observing an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnProgress {
    /// Keep reading.
    Continue,
    /// The envelope just observed was terminal; stop after delivering it.
    Complete,
}

/// State machine deciding when a turn is over.
#[derive(Debug, Default)]
pub struct TurnTracker {
    complete: bool,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an envelope and report whether the turn has ended.
    ///
    /// Once complete, the tracker stays complete; callers must not deliver
    /// envelopes observed after that point.
    pub fn observe(&mut self, envelope: &Envelope) -> TurnProgress {
        if self.complete {
            return TurnProgress::Complete;
        }
        if envelope.is_terminal() {
            self.complete = true;
            TurnProgress::Complete
        } else {
            TurnProgress::Continue
        }
    }
}
