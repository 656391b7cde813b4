//! OpenAI-compatible chat translation domain.
//!
//! - [`request::ChatCompletionRequest`]: the incoming request body
//! - [`prompt::flatten_messages`]: history → single agent prompt
//! - [`prompt::extract_json_schema`]: `response_format` → schema constraint
//! - [`response::ChatCompletion`]: non-streamed result with usage estimate
//! - [`stream::synthesize_stream`]: finished text → chunk frames

pub mod prompt;
pub mod request;
pub mod response;
pub mod stream;
