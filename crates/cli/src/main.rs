//! calagent CLI: the main entry point.
//!
//! Commands:
//! - `gateway`: Start the HTTP chat API
//! - `agent`: Interactive chat or single-message mode
//! - `tools`: List the calendar tools and their arguments
//! - `config`: Show the resolved configuration or a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "calagent",
    about = "calagent: calendar scheduling assistant driven by a ReAct loop",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: ~/.calagent/config.toml)
    #[arg(short, long, global = true, env = "CALAGENT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the calendar agent
    Agent {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Session id the conversation is kept under
        #[arg(short, long, default_value = "cli")]
        session: String,
    },

    /// List available tools
    Tools,

    /// Show configuration
    Config {
        /// Print a default config file instead
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Gateway { port } => commands::gateway::run(config_path, port).await?,
        Commands::Agent { message, session } => {
            commands::agent::run(config_path, message, session).await?
        }
        Commands::Tools => commands::tools::run(config_path)?,
        Commands::Config { default } => commands::config_cmd::run(config_path, default)?,
    }

    Ok(())
}
