//! External viewer launch for `--show`.
//!
//! The path is passed as a single argv entry, never through a shell.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

fn command(program: &str, path: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd.arg(path);
    cmd
}

/// Run `program <path>` and wait for it. A viewer exiting non-zero is only logged.
pub fn open(program: &str, path: &Path) -> Result<()> {
    tracing::info!(program, path = %path.display(), "launching viewer");
    let status = command(program, path)
        .status()
        .with_context(|| format!("failed to launch viewer {:?}", program))?;
    if !status.success() {
        tracing::warn!(program, %status, "viewer exited unsuccessfully");
    }
    Ok(())
}
