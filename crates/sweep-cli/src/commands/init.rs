//! `sweep init` — Write a default sweep configuration.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory).
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let config_path = args.dir.join("sweep.toml");

    if config_path.exists() {
        anyhow::bail!(
            "configuration file already exists at {}",
            config_path.display()
        );
    }

    std::fs::create_dir_all(&args.dir)?;

    let default_config = r#"# Sweep Configuration

# Base58 identity that receives swept funds. The all-zero placeholder below
# must be replaced before running against a real ledger.
destination = "11111111111111111111111111111111"

# Minimum source balance (atomic units) required to attempt a transfer.
min_balance = 1

# Fee assumed when estimation fails after retries (atomic units).
fallback_fee = 5000

# Retries after the first attempt, for each remote call.
max_attempts = 3

# Base backoff delay in milliseconds; doubles on each retry.
base_delay_ms = 500

# Pause between successive non-skipped items (milliseconds). 0 disables.
pacing_ms = 250

# Log level (trace, debug, info, warn, error).
log_level = "info"

# Amount policy: "drain" moves the full balance minus the estimated fee.
# To move a fixed amount instead:
#   [amount_policy.fixed]
#   amount = 100000
amount_policy = "drain"
"#;

    std::fs::write(&config_path, default_config)?;
    println!("Initialized sweep configuration at {}", config_path.display());
    println!("Edit sweep.toml to set the destination identity.");
    println!("Run 'sweep rehearse --file payload.txt' to dry-run a batch.");

    Ok(())
}
