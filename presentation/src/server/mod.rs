//! OpenAI-compatible HTTP gateway.

pub mod error;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use handlers::GatewayState;
pub use routes::create_router;
