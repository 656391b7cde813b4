//! HTTP route definitions.

use super::error::ApiError;
use super::handlers::{self, GatewayState};
use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Create the gateway router.
///
/// `/health` and `/v1/models` are public; `/v1/chat/completions` checks the
/// bearer token when one is configured. A panicking handler answers with a
/// structured 500.
pub fn create_router(state: GatewayState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/models", get(handlers::list_models))
        .route("/v1/chat/completions", post(handlers::chat_completions))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(trace_layer)
        .with_state(state)
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::from_panic(payload).into_response()
}
