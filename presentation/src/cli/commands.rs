//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

/// CLI arguments for agent-gateway
#[derive(Parser, Debug)]
#[command(name = "agent-gateway")]
#[command(author, version, about = "Drive a coding-agent daemon and expose it as an OpenAI-compatible API")]
#[command(long_about = r#"
agent-gateway talks to coding agents in two ways:

  call    Send one prompt to a running agent daemon over its FIFO pair
          (/tmp/agent-in, /tmp/agent-out) and print the answer.
  serve   Run an OpenAI-compatible HTTP gateway that answers
          /v1/chat/completions by invoking the agent helper once per request.

Configuration files are loaded from (in priority order):
1. AGENT_GATEWAY_* environment variables
2. --config <path>             Explicit config file
3. ./agent-gateway.toml        Project-level config
4. ~/.config/agent-gateway/config.toml   Global config

Example:
  agent-gateway call "Summarize src/main.rs"
  git diff | agent-gateway call --no-clear
  agent-gateway serve -H 0.0.0.0 -p 8080
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a prompt to the agent daemon and print the answer
    Call(CallArgs),
    /// Run the OpenAI-compatible HTTP gateway
    Serve(ServeArgs),
    /// List the models served by the gateway
    Models,
    /// Show configuration sources and the effective configuration
    Config,
}

#[derive(Args, Debug, Default)]
pub struct CallArgs {
    /// Prompt text (read from stdin when omitted)
    pub prompt: Option<String>,

    /// Read the prompt from a file
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Keep the daemon's context after the call
    #[arg(long)]
    pub no_clear: bool,

    /// Send the prompt without the one-shot instructions
    #[arg(long)]
    pub raw_prompt: bool,

    /// Seconds of silence before giving up
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Print every envelope as JSON instead of the answer
    #[arg(long)]
    pub raw: bool,
}

impl CallArgs {
    /// Resolve the prompt: `--file`, then the argument, then piped stdin.
    ///
    /// Returns `Ok(None)` when no source is available.
    pub fn read_prompt(&self) -> std::io::Result<Option<String>> {
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path).map(Some);
        }
        if let Some(prompt) = self.prompt.as_ref().filter(|p| !p.is_empty()) {
            return Ok(Some(prompt.clone()));
        }
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Ok(None);
        }
        let mut prompt = String::new();
        stdin.read_to_string(&mut prompt)?;
        Ok(Some(prompt))
    }
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Host to bind to (default from config: 127.0.0.1)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (default from config: 8080)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_call_flags() {
        let cli = Cli::parse_from([
            "agent-gateway",
            "-vv",
            "call",
            "--no-clear",
            "--raw-prompt",
            "-t",
            "2.5",
            "--raw",
            "hello",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Call(args) = cli.command else {
            panic!("expected call");
        };
        assert_eq!(args.prompt.as_deref(), Some("hello"));
        assert!(args.no_clear && args.raw_prompt && args.raw);
        assert_eq!(args.timeout, Some(2.5));
    }

    #[test]
    fn parses_serve_with_short_host_flag() {
        let cli = Cli::parse_from(["agent-gateway", "serve", "-H", "0.0.0.0", "-p", "9000"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(9000));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["agent-gateway", "models", "--no-config"]);
        assert!(cli.no_config);
        assert!(matches!(cli.command, Command::Models));
    }

    #[test]
    fn file_takes_precedence_over_argument() {
        let dir = std::env::temp_dir().join(format!("agent-gateway-prompt-{}", std::process::id()));
        std::fs::write(&dir, "from file").unwrap();
        let args = CallArgs {
            prompt: Some("from arg".to_string()),
            file: Some(dir.clone()),
            ..Default::default()
        };
        assert_eq!(args.read_prompt().unwrap().as_deref(), Some("from file"));
        std::fs::remove_file(dir).unwrap();
    }

    #[test]
    fn argument_is_used_without_file() {
        let args = CallArgs {
            prompt: Some("from arg".to_string()),
            ..Default::default()
        };
        assert_eq!(args.read_prompt().unwrap().as_deref(), Some("from arg"));
    }
}
