//! Envelope reader for the daemon's outbound byte stream.
//!
//! [`EnvelopeReader`] turns any [`AsyncRead`] into a sequence of parsed
//! envelopes. It runs an explicit state machine per call:
//!
//! ```text
//! AwaitingReadiness ──bytes──▶ Reading ──▶ Framing ──▶ Dispatch
//!        ▲   │                                            │
//!        │   └─ 0 bytes: back off, retry                  │
//!        └──────────────── no envelope buffered ──────────┘
//! ```
//!
//! The timeout measures silence: the deadline is pushed back every time bytes
//! arrive, and a zero-length read (a FIFO with no writer attached) counts as
//! silence rather than end of stream.

use agent_gateway_application::{EnvelopeStream, SessionError};
use agent_gateway_domain::{Envelope, LineFramer, preview};
use futures::StreamExt;
use futures::stream;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::Instant;
use tracing::{debug, trace};

/// Size of one underlying read.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Pause after a zero-length read before polling again.
pub const ZERO_READ_BACKOFF: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    /// Waiting for the next bytes, bounded by the silence deadline.
    AwaitingReadiness,
    /// `n` fresh bytes are in the read buffer.
    Reading(usize),
    /// Split buffered bytes into lines and parse them.
    Framing,
    /// Hand out parsed envelopes.
    Dispatch,
}

/// Reads newline-delimited envelopes from `R`.
pub struct EnvelopeReader<R> {
    reader: R,
    timeout: Duration,
    deadline: Instant,
    state: ReadState,
    framer: LineFramer,
    buf: Vec<u8>,
    ready: VecDeque<Envelope>,
    skipped: usize,
}

impl<R: AsyncRead + Unpin> EnvelopeReader<R> {
    pub fn new(reader: R, timeout: Duration) -> Self {
        Self {
            reader,
            timeout,
            deadline: Instant::now() + timeout,
            state: ReadState::AwaitingReadiness,
            framer: LineFramer::new(),
            buf: vec![0u8; READ_CHUNK_SIZE],
            ready: VecDeque::new(),
            skipped: 0,
        }
    }

    /// Number of malformed lines dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Wait for the next envelope.
    ///
    /// Fails with [`SessionError::Timeout`] when nothing arrives within the
    /// timeout, or with [`SessionError::Io`] when the read itself fails.
    pub async fn next_envelope(&mut self) -> Result<Envelope, SessionError> {
        loop {
            match self.state {
                ReadState::AwaitingReadiness => {
                    let read =
                        tokio::time::timeout_at(self.deadline, self.reader.read(&mut self.buf));
                    match read.await {
                        Err(_) => return Err(SessionError::Timeout(self.timeout)),
                        Ok(Err(e)) => return Err(SessionError::Io(e)),
                        Ok(Ok(0)) => {
                            let resume = (Instant::now() + ZERO_READ_BACKOFF).min(self.deadline);
                            tokio::time::sleep_until(resume).await;
                        }
                        Ok(Ok(n)) => self.state = ReadState::Reading(n),
                    }
                }
                ReadState::Reading(n) => {
                    trace!("Read {} bytes from agent", n);
                    self.framer.push(&self.buf[..n]);
                    self.deadline = Instant::now() + self.timeout;
                    self.state = ReadState::Framing;
                }
                ReadState::Framing => {
                    while let Some(line) = self.framer.next_line() {
                        match Envelope::parse_line(&line) {
                            Some(envelope) => self.ready.push_back(envelope),
                            None => {
                                self.skipped += 1;
                                debug!("Skipping malformed line: {}", preview(&line, 80));
                            }
                        }
                    }
                    self.state = ReadState::Dispatch;
                }
                ReadState::Dispatch => match self.ready.pop_front() {
                    Some(envelope) => return Ok(envelope),
                    None => self.state = ReadState::AwaitingReadiness,
                },
            }
        }
    }
}

impl<R: AsyncRead + Unpin + Send + 'static> EnvelopeReader<R> {
    /// Convert into a stream that ends after the first error.
    pub fn into_stream(self) -> EnvelopeStream {
        stream::unfold(Some(self), |reader| async move {
            let Some(mut reader) = reader else {
                return None;
            };
            match reader.next_envelope().await {
                Ok(envelope) => Some((Ok(envelope), Some(reader))),
                Err(e) => Some((Err(e), None)),
            }
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_gateway_domain::EnvelopeKind;
    use tokio::io::AsyncWriteExt;

    const SHORT: Duration = Duration::from_millis(150);

    #[tokio::test]
    async fn reads_envelopes_split_across_writes() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        let mut reader = EnvelopeReader::new(rx, SHORT);

        tx.write_all(b"{\"type\":\"system\"}\n{\"type\":\"res").await.unwrap();
        assert_eq!(reader.next_envelope().await.unwrap().type_name(), "system");

        tx.write_all(b"ult\",\"result\":\"ok\"}\n").await.unwrap();
        let result = reader.next_envelope().await.unwrap();
        assert_eq!(
            result.kind,
            EnvelopeKind::Result {
                result: "ok".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_line_between_valid_envelopes_is_skipped() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        let mut reader = EnvelopeReader::new(rx, SHORT);

        tx.write_all(b"{\"type\":\"system\"}\nnot json at all\n\n{\"type\":\"result\",\"result\":\"x\"}\n")
            .await
            .unwrap();

        assert_eq!(reader.next_envelope().await.unwrap().type_name(), "system");
        assert_eq!(reader.next_envelope().await.unwrap().type_name(), "result");
        assert_eq!(reader.skipped(), 1);
    }

    #[tokio::test]
    async fn silence_times_out() {
        let (_tx, rx) = tokio::io::duplex(64);
        let mut reader = EnvelopeReader::new(rx, Duration::from_millis(50));

        let err = reader.next_envelope().await.unwrap_err();
        assert!(matches!(err, SessionError::Timeout(d) if d == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn closed_writer_is_retried_until_timeout() {
        let (mut tx, rx) = tokio::io::duplex(64);
        tx.write_all(b"{\"type\":\"system\"}\n").await.unwrap();
        drop(tx);

        let mut reader = EnvelopeReader::new(rx, Duration::from_millis(80));
        assert_eq!(reader.next_envelope().await.unwrap().type_name(), "system");

        let started = std::time::Instant::now();
        let err = reader.next_envelope().await.unwrap_err();
        assert!(err.is_timeout());
        assert!(started.elapsed() >= Duration::from_millis(70));
    }

    #[tokio::test]
    async fn arriving_bytes_extend_the_deadline() {
        let (mut tx, rx) = tokio::io::duplex(1024);
        let writer = tokio::spawn(async move {
            for _ in 0..4 {
                tokio::time::sleep(Duration::from_millis(40)).await;
                tx.write_all(b"{\"type\":\"system\"}\n").await.unwrap();
            }
            tx.write_all(b"{\"type\":\"result\",\"result\":\"late\"}\n")
                .await
                .unwrap();
            tx
        });

        // Total elapsed time exceeds the timeout, individual gaps do not.
        let mut reader = EnvelopeReader::new(rx, Duration::from_millis(120));
        for _ in 0..4 {
            assert_eq!(reader.next_envelope().await.unwrap().type_name(), "system");
        }
        assert_eq!(reader.next_envelope().await.unwrap().type_name(), "result");
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn stream_ends_after_timeout() {
        let (mut tx, rx) = tokio::io::duplex(64);
        tx.write_all(b"{\"type\":\"system\"}\n").await.unwrap();

        let items: Vec<_> = EnvelopeReader::new(rx, Duration::from_millis(30))
            .into_stream()
            .collect()
            .await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(SessionError::Timeout(_))));
        drop(tx);
    }
}
