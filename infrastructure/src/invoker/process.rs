//! Process-based agent invoker.
//!
//! Runs the `agent-call` helper once per chat request:
//!
//! ```text
//! agent-call -a <agent> -q [-m <model>] [-c <context>] [-j <schema>] <prompt>
//! ```
//!
//! The child runs in `context` (or the configured work dir), stdout becomes
//! the answer, and a hard timeout kills it.

use agent_gateway_application::{AgentInvocation, AgentInvoker, InvocationOutcome};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default helper program name, resolved through `PATH`.
pub const DEFAULT_AGENT_PROGRAM: &str = "agent-call";

/// [`AgentInvoker`] that spawns the agent helper as a child process.
#[derive(Debug, Clone)]
pub struct AgentCallInvoker {
    program: PathBuf,
    work_dir: PathBuf,
}

impl Default for AgentCallInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT_PROGRAM, ".")
    }
}

impl AgentCallInvoker {
    pub fn new(program: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            work_dir: work_dir.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments for one invocation.
    pub fn arguments(invocation: &AgentInvocation) -> Vec<String> {
        let mut args = vec!["-a".to_string(), invocation.agent.clone(), "-q".to_string()];
        if let Some(model) = &invocation.model {
            args.push("-m".to_string());
            args.push(model.clone());
        }
        if let Some(context) = &invocation.context {
            args.push("-c".to_string());
            args.push(context.clone());
        }
        if let Some(schema) = &invocation.json_schema {
            args.push("-j".to_string());
            args.push(schema.clone());
        }
        args.push(invocation.prompt.clone());
        args
    }

    fn command(&self, invocation: &AgentInvocation) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(Self::arguments(invocation));
        match &invocation.context {
            Some(context) => cmd.current_dir(context),
            None => cmd.current_dir(&self.work_dir),
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl AgentInvoker for AgentCallInvoker {
    async fn invoke(&self, invocation: &AgentInvocation) -> InvocationOutcome {
        let start = Instant::now();
        let child = match self.command(invocation).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn {}: {}", self.program.display(), e);
                return InvocationOutcome::SpawnFailed(e.to_string());
            }
        };

        // Dropping the future on timeout drops the child, which kills it.
        let output =
            match tokio::time::timeout(invocation.timeout, child.wait_with_output()).await {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => return InvocationOutcome::SpawnFailed(e.to_string()),
                Err(_) => {
                    warn!(
                        "Agent {} timed out after {:?}",
                        invocation.agent, invocation.timeout
                    );
                    return InvocationOutcome::TimedOut;
                }
            };

        debug!(
            "Agent {} exited with {:?} in {}ms",
            invocation.agent,
            output.status.code(),
            start.elapsed().as_millis()
        );

        if output.status.success() {
            InvocationOutcome::Completed(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            InvocationOutcome::Failed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        }
    }
}
