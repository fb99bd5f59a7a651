pub mod decode;
pub mod init;
pub mod rehearse;

use std::path::PathBuf;

/// Resolve the payload from a positional argument or a file; exactly one
/// source must be given.
pub(crate) fn read_payload(
    payload: &Option<String>,
    file: &Option<PathBuf>,
) -> anyhow::Result<String> {
    match (payload, file) {
        (Some(p), None) => Ok(p.clone()),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (Some(_), Some(_)) => anyhow::bail!("pass either a payload argument or --file, not both"),
        (None, None) => anyhow::bail!("missing payload: pass it as an argument or via --file"),
    }
}
