//! File logging. The TUI owns the terminal, so logs go to
//! `<data dir>/kb/kb.log` and never to stdout or stderr.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use crate::config::{data_dir, env_var};

pub const LOG_ENV: &str = "KB_LOG";

/// Filter directive: `KB_LOG`, then the configured filter, then `info`.
pub fn filter_directive(env: Option<String>, configured: &str) -> String {
    env.or_else(|| Some(configured.trim().to_string()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "info".to_string())
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("kb.log"))
}

/// Install the global subscriber. Returns the log file path when logging is
/// active; any failure leaves logging disabled.
pub fn init(configured_filter: &str) -> Option<PathBuf> {
    let path = log_path()?;
    let directive = filter_directive(env_var(LOG_ENV), configured_filter);
    match try_init(&path, &directive) {
        Ok(()) => {
            tracing::info!(path = %path.display(), filter = %directive, "logging started");
            Some(path)
        }
        Err(_) => None,
    }
}

fn try_init(path: &Path, directive: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_new(directive).or_else(|_| EnvFilter::try_new("info"))?;

    registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false) // No color codes in file
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
