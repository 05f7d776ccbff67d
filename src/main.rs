mod api;
mod cli;
mod config;
mod error;
mod models;
mod services;
mod store;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::{MatchInput, OutputOptions};
use crate::config::ServerConfig;

#[derive(Parser)]
#[command(name = "match-analyzer")]
#[command(about = "Predictive analysis for a two-team match from historical scores")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Overrides ANALYZER_PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Analyze a match from score lists
    Analyze {
        #[command(flatten)]
        input: MatchInput,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Analyze the built-in Arsenal vs Chelsea sample
    Sample {
        #[command(flatten)]
        output: OutputOptions,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port }) => {
            let config = ServerConfig::from_env().with_port(port);
            tracing::info!("Starting match analyzer API on {}", config.bind_address());
            api::serve(&config).await?;
        }
        Some(Commands::Analyze { input, output }) => {
            tracing::info!(
                "Analyzing {} vs {} ({})",
                input.team1,
                input.team2,
                input.location
            );
            cli::analyze(&input, &output)?;
        }
        Some(Commands::Sample { output }) => {
            cli::analyze_sample(&output)?;
        }
        None => {
            // Default to serving
            let config = ServerConfig::from_env();
            tracing::info!("Starting match analyzer API on {}", config.bind_address());
            api::serve(&config).await?;
        }
    }

    Ok(())
}
