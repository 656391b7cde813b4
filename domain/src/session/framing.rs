//! Newline framing for the session byte stream.
//!
//! [`LineFramer`] buffers raw bytes as they arrive and hands back complete
//! lines. Bytes are kept undecoded until a full line is available so that a
//! multi-byte UTF-8 character split across two reads is reassembled before
//! decoding.

/// Accumulates bytes and splits them into newline-terminated lines.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of bytes read from the channel.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Pop the next complete line, without its terminating `\n`.
    ///
    /// Blank (whitespace-only) lines are consumed and skipped. Returns `None`
    /// when no complete line is buffered yet.
    pub fn next_line(&mut self) -> Option<String> {
        loop {
            let newline = self.buffer.iter().position(|&b| b == b'\n')?;
            let rest = self.buffer.split_off(newline + 1);
            let mut line = std::mem::replace(&mut self.buffer, rest);
            line.pop();

            let line = String::from_utf8_lossy(&line).into_owned();
            if line.trim().is_empty() {
                continue;
            }
            return Some(line);
        }
    }

    /// Number of bytes buffered after the last complete line.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
