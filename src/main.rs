//! Ensemble - multi-agent orchestration runtime
//!
//! Main entry point for the CLI application.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use ensemble::agent::{Agent, ManusAgent, ReactAgent};
use ensemble::llm::ChatClient;
use ensemble::tools::ToolRegistry;
use ensemble::{Config, Flow, Repl};

/// Ensemble - multi-agent task flows
#[derive(Parser, Debug)]
#[command(name = "ensemble")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path (defaults to ~/.config/ensemble/config.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Single task mode (non-interactive)
    #[arg(long, short = 't')]
    task: Option<String>,

    /// Model name override
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        println!("{}", Config::default_config_toml());
        return Ok(());
    }

    // Build configuration
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load(),
    };

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.llm.model = model.clone();
    }

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Ctrl+C cancels the running flow
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    // Wire up the flow
    let llm = Arc::new(ChatClient::from_config(&config));
    let tools = Arc::new(ToolRegistry::with_default_tools(&config));

    let mut agents: HashMap<String, Arc<dyn Agent>> = HashMap::new();
    agents.insert(
        "manus".to_string(),
        Arc::new(ManusAgent::new(
            llm.clone(),
            tools.clone(),
            &config.agent,
        )),
    );
    agents.insert(
        "react".to_string(),
        Arc::new(ReactAgent::new(
            llm.clone(),
            tools.clone(),
            &config.agent,
        )),
    );

    let flow = Flow::new(agents, llm)?;

    // Single task mode
    if let Some(task) = args.task {
        let answer = flow.execute(&cancel, &task).await?;
        println!("{}", answer);
        return Ok(());
    }

    // Interactive REPL mode
    let mut repl = Repl::new(flow, tools, cancel);
    repl.run().await?;

    Ok(())
}
