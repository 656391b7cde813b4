//! HTTP handlers for the OpenAI-compatible surface.

use super::error::ApiError;
use agent_gateway_application::{ChatOutput, CompleteChatUseCase};
use agent_gateway_domain::{ChatCompletionRequest, StreamFrame};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream;
use serde_json::{Value, json};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::warn;

/// Shared state of the HTTP gateway.
#[derive(Clone)]
pub struct GatewayState {
    pub chat: Arc<CompleteChatUseCase>,
}

impl GatewayState {
    pub fn new(chat: Arc<CompleteChatUseCase>) -> Self {
        Self { chat }
    }
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "agent-gateway"}))
}

/// `GET /v1/models`
pub async fn list_models(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": state.chat.models(),
    }))
}

/// `POST /v1/chat/completions`
pub async fn chat_completions(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    state.chat.authorize(authorization)?;

    let request = parse_request(&body)?;
    match state.chat.execute(request).await? {
        ChatOutput::Completion(completion) => Ok(Json(completion).into_response()),
        ChatOutput::Stream(frames) => Ok(sse_response(frames)),
    }
}

fn parse_request(body: &[u8]) -> Result<ChatCompletionRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("Request body required"));
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))?;
    if value.is_null() {
        return Err(ApiError::bad_request("Request body required"));
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(format!("Invalid request: {e}")))
}

/// Render synthetic stream frames as server-sent events.
fn sse_response(frames: Vec<StreamFrame>) -> Response {
    let events: Vec<Result<Event, Infallible>> = frames
        .iter()
        .filter_map(|frame| match frame.to_data() {
            Ok(data) => Some(Ok(Event::default().data(data))),
            Err(e) => {
                warn!("Dropping unserializable stream frame: {}", e);
                None
            }
        })
        .collect();

    (
        [(header::CACHE_CONTROL, "no-cache")],
        Sse::new(stream::iter(events)),
    )
        .into_response()
}
