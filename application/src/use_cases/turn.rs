//! Turn boundary detection over a live envelope stream.

use crate::ports::agent_channel::{EnvelopeStream, SessionError};
use agent_gateway_domain::{Envelope, TurnProgress, TurnTracker};
use futures::StreamExt;
use futures::stream;

/// Limit `envelopes` to one turn.
///
/// Yields envelopes until (and including) the first terminal envelope, then
/// ends without pulling further from the underlying stream. An error item is
/// yielded once and also ends the turn.
pub fn take_turn(envelopes: EnvelopeStream) -> EnvelopeStream {
    stream::unfold(
        Some((envelopes, TurnTracker::new())),
        |state| async move {
            let Some((mut envelopes, mut tracker)) = state else {
                return None;
            };
            match envelopes.next().await {
                None => None,
                Some(Ok(envelope)) => {
                    let next = match tracker.observe(&envelope) {
                        TurnProgress::Continue => Some((envelopes, tracker)),
                        TurnProgress::Complete => None,
                    };
                    Some((Ok(envelope), next))
                }
                Some(Err(e)) => Some((Err(e), None)),
            }
        },
    )
    .boxed()
}

/// Drive one turn to completion, handing each envelope to `on_envelope`.
///
/// Returns the envelopes in arrival order, or the error that ended the turn.
pub async fn collect_turn(
    envelopes: EnvelopeStream,
    mut on_envelope: impl FnMut(&Envelope) + Send,
) -> Result<Vec<Envelope>, SessionError> {
    let mut turn = take_turn(envelopes);
    let mut collected = Vec::new();
    while let Some(item) = turn.next().await {
        let envelope = item?;
        on_envelope(&envelope);
        collected.push(envelope);
    }
    Ok(collected)
}
