use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relnotes::config::{Config, WebhookConfig};
use relnotes::transport;

#[derive(Parser)]
#[command(name = "relnotes")]
#[command(author, version, about = "Publish release notes to a Discord webhook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server accepting release-notes submissions
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Verify config file and webhook environment without sending anything
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "relnotes=debug"
    } else {
        "relnotes=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Serve { port, host } => {
            let config = Config::load()?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            tracing::info!("Starting HTTP server on {}:{}", host, port);
            transport::http::run_http_server(&host, port).await?;
        }
        Commands::Check => {
            let config = Config::load()?;
            tracing::info!(
                "Server config OK: {}:{}",
                config.server.host,
                config.server.port
            );
            let webhook = WebhookConfig::from_env()?;
            tracing::info!(
                "Webhook environment OK (thread configured: {})",
                webhook.thread_id.is_some()
            );
            println!("Configuration OK");
        }
    }

    Ok(())
}
