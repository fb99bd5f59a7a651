//! Sweep CLI — operator tooling for the sweep pipeline.
//!
//! Subcommands: init, decode, rehearse.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Sweep — batch custody-transfer orchestration.
#[derive(Parser, Debug)]
#[command(name = "sweep", version, about, long_about = None)]
struct Cli {
    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default sweep.toml configuration.
    Init(commands::init::InitArgs),
    /// Decode a transport-encoded payload.
    Decode(commands::decode::DecodeArgs),
    /// Drain a decoded batch against the in-memory rehearsal ledger.
    Rehearse(commands::rehearse::RehearseArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Decode(args) => commands::decode::run(args),
        Commands::Rehearse(args) => commands::rehearse::run(args).await,
    }
}
