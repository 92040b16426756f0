//! Main entry point for the Japanese to Korean translation gateway

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ja_ko_translator::cli::commands::{self, Commands};
use ja_ko_translator::GatewayConfig;

/// Japanese to Korean translation gateway backed by a local LLM
#[derive(Parser, Debug)]
#[command(name = "ja-ko-translator", version, about, long_about = None)]
struct Args {
    /// Backend base URL (optional, defaults to OLLAMA_BASE_URL or OLLAMA_HOST/OLLAMA_PORT)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Model identifier (optional, defaults to TRANSLATOR_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Backend timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    let default_filter = format!(
        "{}={},tower_http={}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        log_level,
        log_level
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Override config with CLI args if provided
    let mut config = GatewayConfig::from_env()?;
    if let Some(url) = args.backend_url {
        config.backend_url = url;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }

    // Execute command
    match args.command {
        Commands::Server { host, port } => {
            commands::handle_server(config, host, port).await?;
        }
        Commands::Translate { text, raw } => {
            commands::handle_translate(config, text, raw).await?;
        }
        Commands::Health => {
            commands::handle_health(config).await?;
        }
    }

    Ok(())
}
