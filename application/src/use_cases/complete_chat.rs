//! Complete Chat use case.
//!
//! Translates an OpenAI-style chat-completion request into one bounded agent
//! invocation and formats the answer as a completion object or as a
//! synthetic stream.
//!
//! Agent failures never become errors here: they are folded into the
//! completion text (`Error: ...`) so API consumers always get a completion.
//! Only authentication and request validation produce a [`ChatError`].

use crate::config::GatewayConfig;
use crate::ports::agent_invoker::{AgentInvocation, AgentInvoker};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use agent_gateway_domain::{
    ChatCompletion, ChatCompletionRequest, DomainError, ModelCard, StreamFrame, Usage,
    extract_json_schema, flatten_messages, synthesize_stream,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Errors reported to the API client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Invalid API key")]
    Unauthorized,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("{0}")]
    Internal(String),
}

impl ChatError {
    /// OpenAI-style `error.type` value.
    pub fn error_type(&self) -> &'static str {
        match self {
            ChatError::Unauthorized => "auth_error",
            ChatError::InvalidRequest(_) | ChatError::UnknownModel(_) => "invalid_request_error",
            ChatError::Internal(_) => "internal_error",
        }
    }
}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnknownModel(model) => ChatError::UnknownModel(model),
            DomainError::EmptyMessages => ChatError::InvalidRequest(err.to_string()),
            DomainError::InvalidRoute(_) => ChatError::Internal(err.to_string()),
        }
    }
}

/// What the gateway sends back for one request.
#[derive(Debug, Clone)]
pub enum ChatOutput {
    Completion(ChatCompletion),
    /// Frames to emit as server-sent events, in order.
    Stream(Vec<StreamFrame>),
}

/// Use case for answering chat-completion requests.
pub struct CompleteChatUseCase {
    config: Arc<GatewayConfig>,
    invoker: Arc<dyn AgentInvoker>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl CompleteChatUseCase {
    pub fn new(config: Arc<GatewayConfig>, invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            config,
            invoker,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Check the request's `Authorization` header.
    pub fn authorize(&self, authorization: Option<&str>) -> Result<(), ChatError> {
        if self.config.authorize(authorization) {
            Ok(())
        } else {
            Err(ChatError::Unauthorized)
        }
    }

    /// Models advertised by `GET /v1/models`.
    pub fn models(&self) -> Vec<ModelCard> {
        self.config.routing.model_cards()
    }

    /// Validate, route and answer one request.
    pub async fn execute(&self, request: ChatCompletionRequest) -> Result<ChatOutput, ChatError> {
        if request.messages.is_empty() {
            return Err(DomainError::EmptyMessages.into());
        }

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());
        let route = self.config.routing.resolve(&model)?;

        let prompt = flatten_messages(&request.messages);
        let json_schema = extract_json_schema(request.response_format.as_ref());

        self.conversation_logger.log(ConversationEvent::chat_request(
            &model,
            &route.agent,
            route.model.as_deref(),
            request.stream,
            &prompt,
            json_schema.is_some(),
        ));

        let invocation = AgentInvocation {
            prompt: prompt.clone(),
            agent: route.agent.clone(),
            model: route.model,
            context: request.context,
            json_schema,
            timeout: self.config.invocation_timeout,
        };

        let started = Instant::now();
        let outcome = self.invoker.invoke(&invocation).await;
        let success = outcome.is_success();
        let content = outcome.into_text();

        info!(
            "Chat completion: model={} agent={} prompt_len={} success={} duration={:?}",
            model,
            invocation.agent,
            prompt.len(),
            success,
            started.elapsed()
        );

        let id = completion_id();
        let created = chrono::Utc::now().timestamp();

        self.conversation_logger.log(ConversationEvent::chat_response(
            &id,
            &model,
            success,
            &content,
            started.elapsed(),
        ));

        if request.stream {
            let frames = synthesize_stream(&id, created, &model, &content);
            debug!("Streaming {} frames for {}", frames.len(), id);
            Ok(ChatOutput::Stream(frames))
        } else {
            let usage = Usage::estimate(&prompt, &content);
            Ok(ChatOutput::Completion(ChatCompletion::new(
                id, created, model, content, usage,
            )))
        }
    }
}

/// A fresh completion id: `chatcmpl-` followed by 12 hex digits.
pub fn completion_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("chatcmpl-{}", &hex[..12])
}
