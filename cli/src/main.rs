//! CLI entrypoint for agent-gateway
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use agent_gateway_application::{
    CallAgentInput, CallAgentUseCase, CompleteChatUseCase, ConversationLogger,
};
use agent_gateway_infrastructure::{
    AgentCallInvoker, ConfigLoader, FileConfig, JsonlConversationLogger,
};
use agent_gateway_presentation::{
    CallArgs, Cli, Command, ConsoleFormatter, GatewayState, ServeArgs, create_router,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // === Load Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .context("Failed to load configuration")?;

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }
    if issues.iter().any(|i| i.is_error()) {
        eprint!("{}", ConsoleFormatter::issues(&issues));
        bail!("Invalid configuration");
    }

    match &cli.command {
        Command::Call(args) => run_call(&config, args).await,
        Command::Serve(args) => run_serve(&config, args).await,
        Command::Models => {
            let gateway = config.gateway_config()?;
            print!(
                "{}",
                ConsoleFormatter::model_list(&gateway.routing.model_cards())
            );
            Ok(())
        }
        Command::Config => {
            ConfigLoader::print_config_sources(cli.config.as_ref());
            println!();
            print!(
                "{}",
                ConsoleFormatter::section_header("Effective configuration:")
            );
            println!("{}", ConsoleFormatter::toml(&masked(&config))?);
            Ok(())
        }
    }
}

/// Transcript logger from `[logging] transcript`, if configured.
fn conversation_logger(config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = config.logging.transcript.as_ref()?;
    let logger = JsonlConversationLogger::new(path)?;
    info!("Writing transcript to {}", logger.path().display());
    Some(Arc::new(logger))
}

#[cfg(unix)]
async fn run_call(config: &FileConfig, args: &CallArgs) -> Result<()> {
    use agent_gateway_infrastructure::FifoChannel;

    let prompt = args
        .read_prompt()
        .context("Failed to read prompt")?
        .ok_or_else(|| anyhow!("No prompt provided"))?;

    let mut input = CallAgentInput::with_config(prompt, &config.session.to_session_config())
        .with_clear(!args.no_clear)
        .with_wrap_prompt(!args.raw_prompt);
    if let Some(secs) = args.timeout {
        let timeout = Duration::try_from_secs_f64(secs)
            .map_err(|_| anyhow!("Invalid timeout: {secs}"))?;
        input = input.with_timeout(timeout);
    }

    // === Dependency Injection ===
    let channel = Arc::new(FifoChannel::new(&config.session.fifo_in, &config.session.fifo_out));
    let mut use_case = CallAgentUseCase::new(channel);
    if let Some(logger) = conversation_logger(config) {
        use_case = use_case.with_conversation_logger(logger);
    }

    if args.raw {
        use_case
            .execute_raw(input, |envelope| {
                println!("{}", ConsoleFormatter::envelope_line(envelope))
            })
            .await?;
    } else {
        let answer = use_case.execute(input).await?;
        println!("{}", answer);
    }

    Ok(())
}

#[cfg(not(unix))]
async fn run_call(_config: &FileConfig, _args: &CallArgs) -> Result<()> {
    bail!("The call command needs named pipes and is only available on unix")
}

async fn run_serve(config: &FileConfig, args: &ServeArgs) -> Result<()> {
    let host = args.host.as_deref().unwrap_or(&config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let address = format!("{host}:{port}");

    // === Dependency Injection ===
    let gateway = Arc::new(config.gateway_config()?);
    let invoker = Arc::new(AgentCallInvoker::new(
        &config.agent.program,
        &config.agent.work_dir,
    ));
    let mut chat = CompleteChatUseCase::new(gateway.clone(), invoker);
    if let Some(logger) = conversation_logger(config) {
        chat = chat.with_conversation_logger(logger);
    }

    if let Some(agent) = gateway.routing.forced_agent() {
        info!("Forcing every request to agent '{}'", agent);
    }

    let app = create_router(GatewayState::new(Arc::new(chat)));
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    print!(
        "{}",
        ConsoleFormatter::server_banner(&address, gateway.requires_auth())
    );
    print!("{}", ConsoleFormatter::model_list(&gateway.routing.model_cards()));
    info!("Gateway listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Copy of the config with the API key hidden.
fn masked(config: &FileConfig) -> FileConfig {
    let mut config = config.clone();
    if config.server.api_key().is_some() {
        config.server.api_key = Some("********".to_string());
    }
    config
}
