//! Synthetic streaming.
//!
//! The agent is invoked as a one-shot process, so the full answer exists
//! before anything is sent. Streaming clients still get the incremental
//! chunk protocol they expect: the finished text is cut into fixed-size
//! character chunks, each emitted as a `chat.completion.chunk`, followed by
//! a chunk carrying the stop reason and the `[DONE]` sentinel.
//!
//! This is a pure function of the text so it can be swapped for real
//! token-level streaming without touching request translation.

use super::response::FINISH_REASON_STOP;
use serde::Serialize;

/// Characters per synthetic chunk.
pub const STREAM_CHUNK_CHARS: usize = 20;

/// Sentinel payload of the final SSE event.
pub const STREAM_DONE: &str = "[DONE]";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    pub finish_reason: Option<&'static str>,
}

/// One `chat.completion.chunk` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

/// One event of a synthetic stream, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    Chunk(ChatCompletionChunk),
    Done,
}

impl StreamFrame {
    /// The SSE `data:` payload for this frame.
    pub fn to_data(&self) -> Result<String, serde_json::Error> {
        match self {
            StreamFrame::Chunk(chunk) => serde_json::to_string(chunk),
            StreamFrame::Done => Ok(STREAM_DONE.to_string()),
        }
    }
}

/// Split `text` into chunks of at most `size` characters.
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let size = size.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Build the full frame sequence for a completed answer.
///
/// Every chunk shares `id`, `created` and `model`. An empty answer yields
/// only the stop chunk and `[DONE]`.
pub fn synthesize_stream(id: &str, created: i64, model: &str, content: &str) -> Vec<StreamFrame> {
    let frame = |delta: ChunkDelta, finish_reason: Option<&'static str>| {
        StreamFrame::Chunk(ChatCompletionChunk {
            id: id.to_string(),
            object: "chat.completion.chunk",
            created,
            model: model.to_string(),
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason,
            }],
        })
    };

    let mut frames: Vec<StreamFrame> = chunk_text(content, STREAM_CHUNK_CHARS)
        .into_iter()
        .map(|piece| {
            frame(
                ChunkDelta {
                    content: Some(piece),
                },
                None,
            )
        })
        .collect();
    frames.push(frame(ChunkDelta::default(), Some(FINISH_REASON_STOP)));
    frames.push(StreamFrame::Done);
    frames
}
