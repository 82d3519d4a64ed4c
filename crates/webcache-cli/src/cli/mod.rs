//! CLI for the webcache retrieval tool.

mod console;
mod viewer;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use webcache_core::cache::Cache;
use webcache_core::config::{self, WebcacheConfig};
use webcache_core::http::TcpConnector;
use webcache_core::Fetcher;

use console::Console;

/// Fetch one http:// URL, caching it on disk as `<root>/<host>/<path>`.
#[derive(Debug, Parser)]
#[command(name = "webcache")]
#[command(about = "Fetch an http:// URL through a local on-disk cache", long_about = None)]
pub struct Cli {
    /// URL of the form http://host[:port]/path.
    pub url: String,

    /// Open the fetched file in the viewer afterwards.
    #[arg(short = 's', long)]
    pub show: bool,

    /// Cache root (defaults to `cache_root` from config, then the current directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Viewer program for --show (overrides `viewer` from config).
    #[arg(long, value_name = "PROGRAM")]
    pub viewer: Option<String>,
}

/// How the fetch ended, for the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Served from cache or fetched with 200.
    Fetched,
    /// Server answered, but not with 200; nothing was cached.
    NotFetched,
}

impl Cli {
    pub fn run_from_args() -> Result<RunStatus> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        cli.run(&cfg)
    }

    pub fn run(self, cfg: &WebcacheConfig) -> Result<RunStatus> {
        let root = match self.root.clone().or_else(|| cfg.cache_root.clone()) {
            Some(root) => root,
            None => std::env::current_dir().context("cannot determine current directory")?,
        };
        let fetcher = Fetcher::new(
            Cache::new(root, cfg.path_policy),
            TcpConnector::new(cfg.read_timeout()),
        )
        .with_chunk_size(cfg.read_chunk_bytes);

        let stdout = io::stdout();
        let mut console = Console::new(stdout.lock());
        let outcome = fetcher
            .fetch(&self.url, &mut console)
            .with_context(|| format!("fetch {}", self.url))?;

        if self.show {
            match outcome.cached_path() {
                Some(path) => {
                    let program = self.viewer.as_deref().unwrap_or(&cfg.viewer);
                    viewer::open(program, path)?;
                }
                None => tracing::info!("nothing cached for {}, viewer not started", outcome.url),
            }
        }
        console.finish(&outcome)?;

        Ok(if outcome.is_success() {
            RunStatus::Fetched
        } else {
            RunStatus::NotFetched
        })
    }
}
