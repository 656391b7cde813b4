//! Response aggregation.
//!
//! The agent encodes its answer three ways within one turn: complete
//! `assistant` messages, incremental `content_block_delta` fragments, and the
//! terminal `result` envelope. The `result` text is authoritative; the other
//! two are only a fallback for turns that never produced one.

use super::envelope::{Envelope, EnvelopeKind};

/// Reduces the envelopes of one turn to a single answer string.
#[derive(Debug, Default)]
pub struct ResponseAggregator {
    fragments: String,
    result: Option<String>,
}

impl ResponseAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next envelope in arrival order.
    ///
    /// After a `result` has been seen, further envelopes are ignored.
    pub fn observe(&mut self, envelope: &Envelope) {
        if self.result.is_some() {
            return;
        }
        match &envelope.kind {
            EnvelopeKind::Result { result } => self.result = Some(result.clone()),
            EnvelopeKind::Assistant { texts } => {
                for text in texts {
                    self.fragments.push_str(text);
                }
            }
            EnvelopeKind::ContentBlockDelta { text: Some(text) } => self.fragments.push_str(text),
            EnvelopeKind::ContentBlockDelta { text: None }
            | EnvelopeKind::User { .. }
            | EnvelopeKind::Error { .. }
            | EnvelopeKind::Other { .. } => {}
        }
    }

    /// Returns true once a `result` envelope has been observed.
    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// The final answer: the `result` text if any, else the fallback fragments.
    pub fn finish(self) -> String {
        self.result.unwrap_or(self.fragments)
    }
}

/// Aggregate a complete turn in one call.
pub fn aggregate<'a>(envelopes: impl IntoIterator<Item = &'a Envelope>) -> String {
    let mut aggregator = ResponseAggregator::new();
    for envelope in envelopes {
        aggregator.observe(envelope);
        if aggregator.has_result() {
            break;
        }
    }
    aggregator.finish()
}
