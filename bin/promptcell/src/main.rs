mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "promptcell")]
#[command(about = "An HTTP chat kernel for notebook hosts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one prompt to the configured backend and print the reply
    Chat {
        /// Prompt text
        #[arg(short, long)]
        message: String,

        /// Chat endpoint (overrides config transport.endpoint)
        #[arg(short, long)]
        endpoint: Option<String>,
    },

    /// Print the kernel-info reply as JSON
    Info,

    /// Walk the full discovery flow in-process and execute one prompt
    Demo {
        /// Prompt to execute
        #[arg(short, long, default_value = "What is 6 * 7?")]
        prompt: String,

        /// Chat endpoint (overrides config transport.endpoint)
        #[arg(short, long)]
        endpoint: Option<String>,
    },

    /// Run environment diagnostics
    Doctor,

    /// Run the stdio JSON-RPC test agent
    MockAgent,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup tracing. Logs go to stderr; mock-agent's stdout carries only
    // protocol lines.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Chat { message, endpoint } => {
            commands::chat::run(&message, endpoint.as_deref()).await?;
        }
        Commands::Info => {
            commands::info::run().await?;
        }
        Commands::Demo { prompt, endpoint } => {
            commands::demo::run(&prompt, endpoint.as_deref()).await?;
        }
        Commands::Doctor => {
            commands::doctor::run().await?;
        }
        Commands::MockAgent => {
            commands::mock_agent::run().await?;
        }
    }

    Ok(())
}
