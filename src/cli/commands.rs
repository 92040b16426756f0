//! CLI command definitions and handlers

use clap::Subcommand;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::core::client::Translator;
use crate::core::config::GatewayConfig;

/// Commands for the translation gateway
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP API server
    Server {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },

    /// Translate a single text and print the result
    Translate {
        /// Japanese text (read from stdin when omitted)
        text: Option<String>,

        /// Print the uncleaned backend output to stderr as well
        #[arg(long)]
        raw: bool,
    },

    /// Check that the backend is reachable
    Health,
}

/// Handle server command
pub async fn handle_server(config: GatewayConfig, host: String, port: u16) -> anyhow::Result<()> {
    use crate::server::api::run_server;

    info!("Backend: {} (model {})", config.base_url(), config.model);
    let translator = Translator::with_ollama(config)?;

    println!("Server starting on http://{}:{}", host, port);
    println!("OpenAPI document: http://{}:{}/openapi.json", host, port);

    run_server(host, port, translator).await
}

/// Handle one-shot translation command
pub async fn handle_translate(
    config: GatewayConfig,
    text: Option<String>,
    raw: bool,
) -> anyhow::Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let translator = Translator::with_ollama(config)?;
    let result = translator.translate(&text).await?;

    if raw {
        eprintln!("{}", result.raw_output);
    }
    println!("{}", result.translation);

    Ok(())
}

/// Handle health command
pub async fn handle_health(config: GatewayConfig) -> anyhow::Result<()> {
    let translator = Translator::with_ollama(config)?;
    let status = translator.health().await;
    let model = &translator.config().model;

    if !status.reachable {
        anyhow::bail!("backend {} is unreachable", translator.config().base_url());
    }

    println!("backend: reachable ({})", translator.config().base_url());
    match status.has_model(model) {
        Some(true) => println!("model {}: installed", model),
        _ => println!("model {}: not installed", model),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Cli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_server_defaults() {
        let cli = Cli::try_parse_from(["ja-ko-translator", "server"]).unwrap();
        match cli.command {
            Commands::Server { host, port } => {
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 8000);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_translate_text_argument() {
        let cli = Cli::try_parse_from(["ja-ko-translator", "translate", "こんにちは", "--raw"]).unwrap();
        match cli.command {
            Commands::Translate { text, raw } => {
                assert_eq!(text.as_deref(), Some("こんにちは"));
                assert!(raw);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
