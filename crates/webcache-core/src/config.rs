use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::PathPolicy;
use crate::fetch::DEFAULT_CHUNK_SIZE;

const DEFAULT_VIEWER: &str = "firefox";

fn default_read_chunk_bytes() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_viewer() -> String {
    DEFAULT_VIEWER.to_string()
}

/// Global configuration loaded from `~/.config/webcache/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebcacheConfig {
    /// Socket read buffer size in bytes. Must be non-zero.
    #[serde(default = "default_read_chunk_bytes")]
    pub read_chunk_bytes: usize,
    /// Give up on a silent server after this many seconds (None = wait forever). Must be non-zero.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
    /// "reject-parent" (default) refuses URLs whose path contains `..`; "verbatim" allows them.
    #[serde(default)]
    pub path_policy: PathPolicy,
    /// Program launched with the cached file path by `--show`.
    #[serde(default = "default_viewer")]
    pub viewer: String,
    /// Cache root directory (None = current working directory).
    #[serde(default)]
    pub cache_root: Option<PathBuf>,
}

impl Default for WebcacheConfig {
    fn default() -> Self {
        Self {
            read_chunk_bytes: DEFAULT_CHUNK_SIZE,
            read_timeout_secs: None,
            path_policy: PathPolicy::default(),
            viewer: default_viewer(),
            cache_root: None,
        }
    }
}

impl WebcacheConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.read_chunk_bytes > 0, "read_chunk_bytes must be greater than 0");
        anyhow::ensure!(
            self.read_timeout_secs != Some(0),
            "read_timeout_secs must be greater than 0 (omit it to wait forever)"
        );
        anyhow::ensure!(!self.viewer.trim().is_empty(), "viewer must not be empty");
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("webcache")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WebcacheConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<WebcacheConfig> {
    if !path.exists() {
        let default_cfg = WebcacheConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: WebcacheConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
