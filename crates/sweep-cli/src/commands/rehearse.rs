//! `sweep rehearse` — Dry-run a batch against the in-memory ledger.
//!
//! Decodes the payload, seeds the rehearsal ledger with a balance for every
//! decodable identity, and drives the full orchestration pipeline without
//! touching a real network.

use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sweep_codec::decode_batch;
use sweep_core::{Amount, SweepConfig, TransferOutcome};
use sweep_engine::{DedupGuard, Orchestrator};
use sweep_ledger::{ILedgerClient, MockLedger};

use super::read_payload;

#[derive(Args, Debug)]
pub struct RehearseArgs {
    /// The transport-encoded payload.
    pub payload: Option<String>,

    /// Read the payload from a file instead.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Path to the config file.
    #[arg(short, long, default_value = "sweep.toml")]
    pub config: PathBuf,

    /// Balance seeded for every decodable identity (atomic units).
    #[arg(long, default_value_t = 1_000_000)]
    pub seed_balance: u64,

    /// Fee charged by the rehearsal ledger (atomic units).
    #[arg(long, default_value_t = 5_000)]
    pub fee: u64,

    /// Print the batch result as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: &RehearseArgs) -> anyhow::Result<()> {
    let raw = read_payload(&args.payload, &args.file)?;
    let config = load_config(&args.config)?;

    let requests = decode_batch(raw.trim())?;

    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(args.fee));
    for request in &requests {
        if let Some(identity) = request
            .credential
            .as_ref()
            .and_then(|c| c.derive_identity().ok())
        {
            ledger.seed_balance(identity, Amount(args.seed_balance));
        }
    }

    let orchestrator = Orchestrator::new(
        Arc::clone(&ledger) as Arc<dyn ILedgerClient>,
        Arc::new(DedupGuard::new()),
        config,
    )?;
    let result = orchestrator.run_batch(requests).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Batch {}", result.batch_id);
    for outcome in &result.outcomes {
        let identity = outcome
            .identity()
            .map(|id| id.to_bs58())
            .unwrap_or_else(|| "-".into());
        let status = match outcome {
            TransferOutcome::Succeeded {
                amount_moved,
                confirmation,
                ..
            } => format!("succeeded  moved {} ({})", amount_moved, confirmation),
            TransferOutcome::Failed { reason, .. } => format!("failed     {}", reason),
            TransferOutcome::Skipped { reason, .. } => format!("skipped    {}", reason),
        };
        println!("  {:<20} {:<46} {}", outcome.source_hint(), identity, status);
    }
    println!();
    println!(
        "{} succeeded, {} failed, {} skipped; {} moved",
        result.succeeded_count(),
        result.failed_count(),
        result.skipped_count(),
        result.total_moved()
    );

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<SweepConfig> {
    if path.exists() {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    } else {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        Ok(SweepConfig::default())
    }
}
