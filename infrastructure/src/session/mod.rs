//! Session transport: the FIFO pair shared with the agent daemon.

mod fifo;
mod reader;

pub use fifo::{DEFAULT_FIFO_IN, DEFAULT_FIFO_OUT, DEFAULT_OPEN_TIMEOUT, FifoChannel};
pub use reader::{EnvelopeReader, READ_CHUNK_SIZE, ZERO_READ_BACKOFF};
