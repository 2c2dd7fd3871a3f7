use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter, e.g. `debug` or `mathboard_core=trace`.
pub const LOG_ENV: &str = "MATHBOARD_LOG";

pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("mathboard")
}

/// Send tracing output to `mathboard.log` in the cache directory.
///
/// The terminal belongs to the TUI, so nothing is written to stdout or
/// stderr. Returns the log file path.
pub fn init() -> Result<PathBuf> {
    init_in(&log_dir())
}

fn init_in(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create log directory {}", dir.display()))?;

    let path = dir.join("mathboard.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Cannot open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false),
        )
        .try_init()
        .context("Tracing subscriber already installed")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unusable_log_dir_is_reported() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let dir = file.path().join("mathboard");

        let err = init_in(&dir).unwrap_err();
        assert!(err.to_string().starts_with("Cannot create log directory"));
    }
}
