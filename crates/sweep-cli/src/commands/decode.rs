//! `sweep decode` — Decode a transport-encoded payload.

use clap::Args;
use std::path::PathBuf;

use sweep_codec::{decode_payload, extract_requests, Decoded};

use super::read_payload;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// The transport-encoded payload.
    pub payload: Option<String>,

    /// Read the payload from a file instead.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Also extract the transfer-request batch and print a summary.
    #[arg(short, long)]
    pub batch: bool,
}

pub fn run(args: &DecodeArgs) -> anyhow::Result<()> {
    let raw = read_payload(&args.payload, &args.file)?;

    match decode_payload(raw.trim())? {
        Decoded::Structured(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            if args.batch {
                let requests = extract_requests(&value)?;
                println!();
                println!("Batch: {} request(s)", requests.len());
                for (index, request) in requests.iter().enumerate() {
                    let identity = request
                        .credential
                        .as_ref()
                        .and_then(|c| c.derive_identity().ok())
                        .map(|id| id.to_bs58())
                        .unwrap_or_else(|| "-".into());
                    println!("  [{index}] {:<20} {}", request.source_hint, identity);
                }
            }
        }
        Decoded::Text(text) => {
            if args.batch {
                anyhow::bail!("payload decoded to plain text, not a structured batch");
            }
            println!("{}", text);
        }
    }

    Ok(())
}
