//! Call Agent use case.
//!
//! Drives one call against the long-running agent daemon: submit a prompt,
//! collect the turn, reduce it to the answer text, then optionally reset the
//! daemon's context and drain the acknowledgement so it cannot leak into the
//! next call's turn.

use crate::config::SessionConfig;
use crate::ports::agent_channel::{AgentChannel, SessionError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::use_cases::turn::collect_turn;
use agent_gateway_domain::{Envelope, ResponseAggregator, UserEnvelope, preview, wrap_one_shot};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Read timeout for the acknowledgement drain after a context reset.
pub const CLEAR_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Input for the [`CallAgentUseCase`].
#[derive(Debug, Clone)]
pub struct CallAgentInput {
    pub prompt: String,
    /// Reset the daemon's context after the answer is collected.
    pub clear: bool,
    /// Silence allowed on the outbound channel during the primary turn.
    pub timeout: Duration,
    /// Append the one-shot instruction block to the prompt.
    pub wrap_prompt: bool,
}

impl CallAgentInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self::with_config(prompt, &SessionConfig::default())
    }

    /// Create an input using the given session defaults.
    pub fn with_config(prompt: impl Into<String>, config: &SessionConfig) -> Self {
        Self {
            prompt: prompt.into(),
            clear: config.clear,
            timeout: config.timeout,
            wrap_prompt: config.wrap_prompt,
        }
    }

    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_wrap_prompt(mut self, wrap: bool) -> Self {
        self.wrap_prompt = wrap;
        self
    }
}

/// Which part of a call an envelope was received in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    /// The turn answering the caller's prompt.
    Primary,
    /// The acknowledgement of the context reset.
    Drain,
}

impl CallPhase {
    fn as_str(self) -> &'static str {
        match self {
            CallPhase::Primary => "primary",
            CallPhase::Drain => "drain",
        }
    }
}

/// Use case for one call against the agent daemon.
///
/// Calls must not overlap on the same channel: the protocol carries no
/// correlation id, so a second turn would read the first one's envelopes.
pub struct CallAgentUseCase {
    channel: Arc<dyn AgentChannel>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl CallAgentUseCase {
    pub fn new(channel: Arc<dyn AgentChannel>) -> Self {
        Self {
            channel,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Run the call and return the aggregated answer text.
    pub async fn execute(&self, input: CallAgentInput) -> Result<String, SessionError> {
        let mut aggregator = ResponseAggregator::new();
        self.run(input, &mut |phase, envelope| {
            if phase == CallPhase::Primary {
                aggregator.observe(envelope);
            }
        })
        .await?;

        let answer = aggregator.finish();
        self.conversation_logger
            .log(ConversationEvent::session_result(&answer));
        Ok(answer)
    }

    /// Run the call without aggregation, forwarding every envelope verbatim.
    ///
    /// Envelopes of the primary turn and of the reset drain both reach
    /// `on_envelope`, in arrival order.
    pub async fn execute_raw(
        &self,
        input: CallAgentInput,
        mut on_envelope: impl FnMut(&Envelope) + Send,
    ) -> Result<(), SessionError> {
        self.run(input, &mut |_, envelope| on_envelope(envelope))
            .await
    }

    async fn run(
        &self,
        input: CallAgentInput,
        sink: &mut (dyn FnMut(CallPhase, &Envelope) + Send),
    ) -> Result<(), SessionError> {
        if !self.channel.is_reachable() {
            return Err(SessionError::DaemonNotReachable(self.channel.endpoint()));
        }

        info!(
            "Calling agent (clear={}, timeout={:?}): {}",
            input.clear,
            input.timeout,
            preview(&input.prompt, 100)
        );

        let prompt = if input.wrap_prompt {
            wrap_one_shot(&input.prompt)
        } else {
            input.prompt
        };
        self.channel.send(&UserEnvelope::prompt(prompt)).await?;
        self.collect(CallPhase::Primary, input.timeout, sink).await?;

        if input.clear {
            self.reset_context(sink).await;
        }
        Ok(())
    }

    async fn collect(
        &self,
        phase: CallPhase,
        timeout: Duration,
        sink: &mut (dyn FnMut(CallPhase, &Envelope) + Send),
    ) -> Result<(), SessionError> {
        let envelopes = self.channel.receive(timeout).await?;
        let turn = collect_turn(envelopes, |envelope| {
            debug!("{} envelope: {}", phase.as_str(), envelope.type_name());
            self.conversation_logger.log(ConversationEvent::session_envelope(
                phase.as_str(),
                &envelope.raw,
            ));
            sink(phase, envelope);
        })
        .await?;
        debug!("{} turn ended after {} envelopes", phase.as_str(), turn.len());
        Ok(())
    }

    /// Send the reset command and drain its acknowledgement.
    ///
    /// Never fails the call: the answer has already been collected.
    async fn reset_context(&self, sink: &mut (dyn FnMut(CallPhase, &Envelope) + Send)) {
        if let Err(e) = self.channel.send(&UserEnvelope::clear()).await {
            warn!("Failed to send context reset: {}", e);
            return;
        }
        match self.collect(CallPhase::Drain, CLEAR_DRAIN_TIMEOUT, sink).await {
            Ok(()) => debug!("Context reset acknowledged"),
            Err(e) if e.is_timeout() => debug!("Context reset drain timed out"),
            Err(e) => warn!("Context reset drain failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent_channel::EnvelopeStream;
    use async_trait::async_trait;
    use futures::StreamExt;
    use futures::stream;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    type ScriptedTurn = Vec<Result<Envelope, SessionError>>;

    /// Channel that replays scripted turns and records what was sent.
    struct ScriptedChannel {
        reachable: bool,
        turns: Mutex<VecDeque<ScriptedTurn>>,
        sent: Mutex<Vec<UserEnvelope>>,
        timeouts: Mutex<Vec<Duration>>,
        fail_sends_after: Option<usize>,
    }

    impl ScriptedChannel {
        fn new(turns: Vec<ScriptedTurn>) -> Self {
            Self {
                reachable: true,
                turns: Mutex::new(turns.into()),
                sent: Mutex::new(Vec::new()),
                timeouts: Mutex::new(Vec::new()),
                fail_sends_after: None,
            }
        }

        fn sent(&self) -> Vec<UserEnvelope> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AgentChannel for ScriptedChannel {
        fn endpoint(&self) -> String {
            "/tmp/test-agent-in".to_string()
        }

        fn is_reachable(&self) -> bool {
            self.reachable
        }

        async fn send(&self, envelope: &UserEnvelope) -> Result<(), SessionError> {
            let mut sent = self.sent.lock().unwrap();
            if self.fail_sends_after.is_some_and(|n| sent.len() >= n) {
                return Err(SessionError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "reader gone",
                )));
            }
            sent.push(envelope.clone());
            Ok(())
        }

        async fn receive(&self, timeout: Duration) -> Result<EnvelopeStream, SessionError> {
            self.timeouts.lock().unwrap().push(timeout);
            let turn = self
                .turns
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| vec![Err(SessionError::Timeout(timeout))]);
            Ok(stream::iter(turn).boxed())
        }
    }

    fn env(line: &str) -> Envelope {
        Envelope::parse_line(line).unwrap()
    }

    fn answer_turn() -> ScriptedTurn {
        vec![
            Ok(env(r#"{"type":"system","subtype":"init"}"#)),
            Ok(env(
                r#"{"type":"assistant","message":{"content":[{"type":"text","text":"draft"}]}}"#,
            )),
            Ok(env(r#"{"type":"result","result":"final answer"}"#)),
        ]
    }

    fn ack_turn() -> ScriptedTurn {
        vec![Ok(env(r#"{"type":"result","result":"cleared"}"#))]
    }

    #[tokio::test]
    async fn returns_result_and_clears_context() {
        let channel = Arc::new(ScriptedChannel::new(vec![answer_turn(), ack_turn()]));
        let use_case = CallAgentUseCase::new(channel.clone());

        let answer = use_case.execute(CallAgentInput::new("What is 2+2?")).await.unwrap();
        assert_eq!(answer, "final answer");

        let sent = channel.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].message.content.starts_with("What is 2+2?\n\n---\n"));
        assert!(sent[1].is_clear());
        assert_eq!(
            *channel.timeouts.lock().unwrap(),
            vec![Duration::from_secs(120), CLEAR_DRAIN_TIMEOUT]
        );
    }

    #[tokio::test]
    async fn raw_prompt_is_sent_unwrapped() {
        let channel = Arc::new(ScriptedChannel::new(vec![answer_turn()]));
        let use_case = CallAgentUseCase::new(channel.clone());

        let input = CallAgentInput::new("/status")
            .with_wrap_prompt(false)
            .with_clear(false);
        use_case.execute(input).await.unwrap();

        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message.content, "/status");
    }

    #[tokio::test]
    async fn unreachable_daemon_fails_before_writing() {
        let mut channel = ScriptedChannel::new(vec![answer_turn()]);
        channel.reachable = false;
        let channel = Arc::new(channel);
        let use_case = CallAgentUseCase::new(channel.clone());

        let err = use_case.execute(CallAgentInput::new("hi")).await.unwrap_err();
        assert!(matches!(err, SessionError::DaemonNotReachable(ref p) if p == "/tmp/test-agent-in"));
        assert!(channel.sent().is_empty());
    }

    #[tokio::test]
    async fn primary_timeout_is_fatal_and_skips_clear() {
        let channel = Arc::new(ScriptedChannel::new(vec![vec![
            Ok(env(r#"{"type":"system"}"#)),
            Err(SessionError::Timeout(Duration::from_secs(3))),
        ]]));
        let use_case = CallAgentUseCase::new(channel.clone());

        let input = CallAgentInput::new("slow").with_timeout(Duration::from_secs(3));
        let err = use_case.execute(input).await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(channel.sent().len(), 1);
    }

    #[tokio::test]
    async fn drain_timeout_does_not_fail_the_call() {
        // No second scripted turn: the drain times out.
        let channel = Arc::new(ScriptedChannel::new(vec![answer_turn()]));
        let use_case = CallAgentUseCase::new(channel.clone());

        let answer = use_case.execute(CallAgentInput::new("hi")).await.unwrap();
        assert_eq!(answer, "final answer");
        assert!(channel.sent()[1].is_clear());
    }

    #[tokio::test]
    async fn drain_io_error_and_failed_reset_are_swallowed() {
        let channel = Arc::new(ScriptedChannel::new(vec![
            answer_turn(),
            vec![Err(SessionError::Io(std::io::Error::other("pipe closed")))],
        ]));
        let use_case = CallAgentUseCase::new(channel);
        assert_eq!(
            use_case.execute(CallAgentInput::new("hi")).await.unwrap(),
            "final answer"
        );

        let mut channel = ScriptedChannel::new(vec![answer_turn()]);
        channel.fail_sends_after = Some(1);
        let use_case = CallAgentUseCase::new(Arc::new(channel));
        assert_eq!(
            use_case.execute(CallAgentInput::new("hi")).await.unwrap(),
            "final answer"
        );
    }

    #[tokio::test]
    async fn drain_envelopes_do_not_leak_into_answer() {
        let channel = Arc::new(ScriptedChannel::new(vec![
            vec![
                Ok(env(r#"{"type":"content_block_delta","delta":{"type":"text_delta","text":"4"}}"#)),
                Ok(env(r#"{"type":"error","error":"interrupted"}"#)),
            ],
            vec![Ok(env(
                r#"{"type":"assistant","message":{"content":[{"type":"text","text":"Context cleared"}]}}"#,
            ))],
        ]));
        let use_case = CallAgentUseCase::new(channel);

        let answer = use_case.execute(CallAgentInput::new("2+2")).await.unwrap();
        assert_eq!(answer, "4");
    }

    #[tokio::test]
    async fn raw_mode_forwards_primary_and_drain_envelopes() {
        let channel = Arc::new(ScriptedChannel::new(vec![answer_turn(), ack_turn()]));
        let use_case = CallAgentUseCase::new(channel);

        let mut seen = Vec::new();
        use_case
            .execute_raw(CallAgentInput::new("hi"), |e| seen.push(e.raw.clone()))
            .await
            .unwrap();

        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0]["subtype"], "init");
        assert_eq!(seen[2]["result"], "final answer");
        assert_eq!(seen[3]["result"], "cleared");
    }

    #[tokio::test]
    async fn conversation_logger_receives_envelopes_and_result() {
        struct Recorder(Mutex<Vec<(&'static str, serde_json::Value)>>);
        impl ConversationLogger for Recorder {
            fn log(&self, event: ConversationEvent) {
                self.0
                    .lock()
                    .unwrap()
                    .push((event.event_type(), event.payload));
            }
        }

        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let channel = Arc::new(ScriptedChannel::new(vec![answer_turn(), ack_turn()]));
        let use_case = CallAgentUseCase::new(channel).with_conversation_logger(recorder.clone());
        use_case.execute(CallAgentInput::new("hi")).await.unwrap();

        let events = recorder.0.lock().unwrap();
        let types: Vec<_> = events.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            types,
            vec![
                "session_envelope",
                "session_envelope",
                "session_envelope",
                "session_envelope",
                "session_result"
            ]
        );
        assert_eq!(events[3].1["phase"], "drain");
        assert_eq!(events[4].1["text"], "final answer");
    }
}
