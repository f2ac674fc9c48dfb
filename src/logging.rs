//! Tracing setup. Output goes to a file because the terminal belongs to the TUI.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber appending to `path`. The filter comes
/// from `RUST_LOG` and defaults to `info`.
pub fn init(path: &Path) -> Result<()> {
    crate::config::ensure_parent(path)
        .with_context(|| format!("create log directory for {}", path.display()))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))?;
    Ok(())
}
