// CLI tool for the lending workflow client
//
// This binary drives the two workflows end to end: a collateralized
// borrow-and-repay cycle against the lending pool, and a single-hop
// token swap through the router.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lendflow::FlowConfig;

#[derive(Parser)]
#[command(name = "lendflow")]
#[command(about = "Lending market workflow client", long_about = None)]
#[command(version)]
struct Cli {
    /// RPC URL to connect to
    #[arg(long, default_value = "http://localhost:8545")]
    rpc_url: String,

    /// Configuration file path
    #[arg(long, default_value = "lendflow.toml")]
    config: String,

    /// Network entry to use, overriding the config file
    #[arg(long)]
    network: Option<String>,

    /// Path to a file holding the signer's hex private key
    /// (falls back to the LENDFLOW_PRIVATE_KEY environment variable)
    #[arg(long)]
    keypair: Option<String>,

    /// Override log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the collateralized borrow-and-repay workflow (default)
    Borrow(commands::borrow::BorrowCmd),

    /// Run the single-hop swap workflow
    Swap(commands::swap::SwapCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    // Load configuration
    let mut config = if std::path::Path::new(&cli.config).exists() {
        FlowConfig::load(&cli.config)?
    } else {
        warn!("Config file not found, using defaults: {}", cli.config);
        FlowConfig::default()
    };

    if let Some(network) = cli.network.clone() {
        config.network = network;
    }

    match cli.command {
        Some(Commands::Borrow(cmd)) => {
            commands::borrow::execute(cmd, &cli.rpc_url, cli.keypair.as_deref(), config).await
        }
        Some(Commands::Swap(cmd)) => {
            commands::swap::execute(cmd, &cli.rpc_url, cli.keypair.as_deref(), config).await
        }
        None => {
            commands::borrow::execute(
                commands::borrow::BorrowCmd::default(),
                &cli.rpc_url,
                cli.keypair.as_deref(),
                config,
            )
            .await
        }
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lendflow={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
