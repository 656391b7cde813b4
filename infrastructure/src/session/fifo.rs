//! Named-pipe channel to the agent daemon.
//!
//! The daemon reads user envelopes from the inbound FIFO and writes its
//! replies to the outbound FIFO. Each endpoint is opened only for the span of
//! one operation: the inbound pipe for one write, the outbound pipe for one
//! collection pass.

use super::reader::{EnvelopeReader, ZERO_READ_BACKOFF};
use agent_gateway_application::{AgentChannel, EnvelopeStream, SessionError};
use agent_gateway_domain::UserEnvelope;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::unix::pipe;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_FIFO_IN: &str = "/tmp/agent-in";
pub const DEFAULT_FIFO_OUT: &str = "/tmp/agent-out";

/// How long `send` waits for the daemon to open its end of the inbound pipe.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(5);

/// [`AgentChannel`] over a pair of named pipes.
#[derive(Debug, Clone)]
pub struct FifoChannel {
    inbound: PathBuf,
    outbound: PathBuf,
    open_timeout: Duration,
}

impl Default for FifoChannel {
    fn default() -> Self {
        Self::new(DEFAULT_FIFO_IN, DEFAULT_FIFO_OUT)
    }
}

impl FifoChannel {
    pub fn new(inbound: impl Into<PathBuf>, outbound: impl Into<PathBuf>) -> Self {
        Self {
            inbound: inbound.into(),
            outbound: outbound.into(),
            open_timeout: DEFAULT_OPEN_TIMEOUT,
        }
    }

    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = timeout;
        self
    }

    pub fn inbound(&self) -> &Path {
        &self.inbound
    }

    pub fn outbound(&self) -> &Path {
        &self.outbound
    }

    /// Open the inbound pipe for writing.
    ///
    /// A non-blocking open fails with `ENXIO` while no reader has the pipe
    /// open; that case is retried until `open_timeout` elapses.
    async fn open_sender(&self) -> Result<pipe::Sender, SessionError> {
        let deadline = Instant::now() + self.open_timeout;
        loop {
            match pipe::OpenOptions::new().open_sender(&self.inbound) {
                Ok(sender) => return Ok(sender),
                Err(e) if e.raw_os_error() == Some(libc::ENXIO) => {
                    if Instant::now() >= deadline {
                        return Err(SessionError::DaemonNotReachable(self.endpoint()));
                    }
                    tokio::time::sleep(ZERO_READ_BACKOFF).await;
                }
                Err(e) => return Err(SessionError::Io(e)),
            }
        }
    }
}

#[async_trait]
impl AgentChannel for FifoChannel {
    fn endpoint(&self) -> String {
        self.inbound.display().to_string()
    }

    fn is_reachable(&self) -> bool {
        self.inbound.exists()
    }

    async fn send(&self, envelope: &UserEnvelope) -> Result<(), SessionError> {
        let line = envelope.to_line()?;
        let mut sender = self.open_sender().await?;
        sender.write_all(line.as_bytes()).await?;
        sender.flush().await?;
        debug!("Sent {} bytes to {}", line.len(), self.inbound.display());
        Ok(())
    }

    async fn receive(&self, timeout: Duration) -> Result<EnvelopeStream, SessionError> {
        let receiver = pipe::OpenOptions::new().open_receiver(&self.outbound)?;
        Ok(EnvelopeReader::new(receiver, timeout).into_stream())
    }
}
