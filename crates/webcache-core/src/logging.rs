//! Logging init: append to a file under the XDG state dir, or fall back to stderr.
//!
//! Stdout belongs to the response echo, so log lines never go there.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,webcache=debug,webcache_core=debug";
const LOG_FILE_NAME: &str = "webcache.log";

/// `directives` if they parse, otherwise the built-in default.
fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn env_filter() -> EnvFilter {
    filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish()
}

fn open_log_file(path: &Path) -> Result<File> {
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Location of the log file, `~/.local/state/webcache/webcache.log`. Creates the directory.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("webcache")?;
    Ok(xdg_dirs.place_state_file(LOG_FILE_NAME)?)
}

/// Install the global subscriber writing to the XDG state log file.
/// Errors (unwritable state dir, subscriber already set) let the caller fall back to stderr.
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = open_log_file(&path)?;
    tracing::subscriber::set_global_default(subscriber(env_filter(), Mutex::new(file)))
        .context("install log subscriber")?;
    tracing::info!("webcache logging initialized at {}", path.display());
    Ok(())
}

/// Log to stderr only. Used when [`init_logging`] fails so the CLI still runs.
pub fn init_logging_stderr() {
    let _ = tracing::subscriber::set_global_default(subscriber(env_filter(), std::io::stderr));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(path: &Path, directives: Option<&str>, emit: impl FnOnce()) -> String {
        let file = open_log_file(path).unwrap();
        tracing::subscriber::with_default(subscriber(filter(directives), Mutex::new(file)), emit);
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn default_filter_keeps_crate_debug_and_drops_foreign_debug() {
        let dir = tempfile::tempdir().unwrap();
        let text = capture(&dir.path().join(LOG_FILE_NAME), None, || {
            tracing::debug!("crate detail");
            tracing::debug!(target: "hyperactive_dep", "foreign detail");
            tracing::info!(target: "hyperactive_dep", "foreign notice");
        });
        assert!(text.contains("crate detail"));
        assert!(!text.contains("foreign detail"));
        assert!(text.contains("foreign notice"));
    }

    #[test]
    fn explicit_directives_override_default() {
        let dir = tempfile::tempdir().unwrap();
        let text = capture(&dir.path().join(LOG_FILE_NAME), Some("warn"), || {
            tracing::info!("quiet");
            tracing::warn!("loud");
        });
        assert!(!text.contains("quiet"));
        assert!(text.contains("loud"));
    }

    #[test]
    fn log_file_is_appended_without_ansi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "earlier run\n").unwrap();
        let text = capture(&path, None, || tracing::info!(size = 7, "cache hit"));
        assert!(text.starts_with("earlier run\n"));
        assert!(text.contains("cache hit size=7"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn missing_log_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_log_file(&dir.path().join("absent/webcache.log")).unwrap_err();
        assert!(format!("{:#}", err).contains("open log file"));
    }
}
