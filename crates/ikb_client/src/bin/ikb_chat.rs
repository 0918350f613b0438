//! ikb-chat: terminal front end for the knowledge-base assistant.
//! Reads config, then either answers one question given on the command line
//! or runs an interactive session over stdin, printing the conversation to
//! stdout.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ikb_client::{
    config, ChatService, Config, Controller, HttpChatClient, Renderer, SubmitOutcome,
    TerminalRenderer,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ikb-chat", version, about = "Chat with the knowledge-base assistant")]
struct Args {
    /// Ask a single question and exit. Without it, questions are read from stdin.
    question: Option<String>,
    /// Config file (defaults to ~/.ikb/config.yaml).
    #[arg(long, env = "IKB_CONFIG")]
    config: Option<PathBuf>,
    /// Chat endpoint URL, overriding the config.
    #[arg(long)]
    endpoint: Option<String>,
    /// Start without the greeting message.
    #[arg(long)]
    no_greeting: bool,
    /// Write the effective config to the config path and exit.
    #[arg(long)]
    init_config: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config_path = args
        .config
        .clone()
        .or_else(config::default_config_path)
        .context("unable to determine config path (set --config or IKB_CONFIG)")?;

    let mut cfg = config::load_or_default(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    if let Some(endpoint) = &args.endpoint {
        cfg.service.endpoint = Some(endpoint.clone());
    }

    if args.init_config {
        config::save(&config_path, &cfg.resolved())?;
        println!("Wrote {}", config_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;
    rt.block_on(run(&args, &cfg))
}

async fn run(args: &Args, cfg: &Config) -> Result<ExitCode> {
    let service = HttpChatClient::new(cfg.endpoint());
    info!(endpoint = service.endpoint(), "chat session started");
    let mut renderer = TerminalRenderer::new(io::stdout());

    if let Some(question) = args.question.as_deref() {
        if question.trim().is_empty() {
            bail!("no question provided");
        }
        let mut controller = Controller::new();
        let outcome = exchange(&mut controller, &service, &mut renderer, question).await?;
        return Ok(match outcome {
            SubmitOutcome::Failed(_) => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        });
    }

    let mut controller = match cfg.greeting() {
        Some(greeting) if !args.no_greeting => Controller::with_greeting(greeting),
        _ => Controller::new(),
    };
    renderer.sync(controller.log())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim() == "/quit" {
            break;
        }
        controller.set_input(line);
        if !controller.can_send() {
            continue;
        }
        let text = controller.input().to_string();
        exchange(&mut controller, &service, &mut renderer, &text).await?;
    }
    info!(messages = controller.log().len(), "chat session ended");
    Ok(ExitCode::SUCCESS)
}

/// One question/answer round, drawing the question before the request goes out.
async fn exchange<S, W>(
    controller: &mut Controller,
    service: &S,
    renderer: &mut TerminalRenderer<W>,
    text: &str,
) -> Result<SubmitOutcome>
where
    S: ChatService + ?Sized,
    W: io::Write,
{
    let Some(request) = controller.begin(text) else {
        return Ok(SubmitOutcome::Ignored);
    };
    renderer.sync(controller.log())?;
    renderer.waiting(true)?;

    let outcome = controller.resolve(service.send(&request).await);

    renderer.waiting(false)?;
    renderer.sync(controller.log())?;
    Ok(outcome)
}
