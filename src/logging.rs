use crate::config::Config;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("ASKR_LOG").unwrap_or_else(|_| EnvFilter::new("askr=info"))
}

/// Route diagnostics to a log file so they never bleed into the TUI.
pub fn init_file(config: &Config) -> Result<()> {
    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("askr.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();

    Ok(())
}

/// Stderr diagnostics for one-shot CLI commands.
pub fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}
