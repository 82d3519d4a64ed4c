//! URL → relative cache path mapping.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::CacheError;
use crate::url_model::ParsedUrl;

/// File name used when the URL path has no trailing segment (`/dir/`).
pub const INDEX_FILE: &str = "index.html";

/// How `..` in the host or path is treated when building the cache path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathPolicy {
    /// Refuse any `..` segment; it would resolve outside the cache root.
    #[default]
    RejectParent,
    /// Use segments exactly as they appear in the URL, `..` included.
    Verbatim,
}

/// Where a URL lives in the cache, relative to the cache root.
///
/// `dirs` is every directory that must exist before the file is written,
/// host first; `file_name` is the last path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLocation {
    dirs: Vec<String>,
    file_name: String,
}

impl CacheLocation {
    /// Map `url` to `host/<path without leading slash>`.
    ///
    /// Empty segments (`a//b`) are skipped. A path ending in `/` gets
    /// [`INDEX_FILE`] as its file name.
    pub fn for_url(url: &ParsedUrl, policy: PathPolicy) -> Result<Self, CacheError> {
        let mut segments: Vec<&str> = url.path()[1..].split('/').collect();
        let last = segments.pop().unwrap_or("");
        let file_name = if last.is_empty() { INDEX_FILE } else { last };

        let mut dirs = Vec::with_capacity(segments.len() + 1);
        dirs.push(url.host().to_string());
        dirs.extend(
            segments
                .into_iter()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );

        if policy == PathPolicy::RejectParent {
            let escapes = url.host() == ".."
                || dirs.iter().any(|d| d == "..")
                || file_name == "..";
            if escapes {
                return Err(CacheError::UnsafePath {
                    url: url.to_string(),
                });
            }
        }

        Ok(CacheLocation {
            dirs,
            file_name: file_name.to_string(),
        })
    }

    /// Directory segments, host first.
    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// `host/a/b.html`, relative to the cache root.
    pub fn relative_path(&self) -> PathBuf {
        let mut p: PathBuf = self.dirs.iter().collect();
        p.push(&self.file_name);
        p
    }
}
