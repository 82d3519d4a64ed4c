//! On-disk cache layout, probing and directory preparation.
//!
//! Every URL maps to `root/host/<path>`. Any regular file already at that
//! location is a hit, including an empty one; nothing is ever expired.

mod layout;

pub use layout::{CacheLocation, PathPolicy, INDEX_FILE};

use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::url_model::ParsedUrl;

#[derive(Debug, Error)]
pub enum CacheError {
    /// The URL contains `..` and the cache runs with [`PathPolicy::RejectParent`].
    #[error("refusing to cache {url}: parent-directory segment would escape the cache root")]
    UnsafePath { url: String },
}

/// A directory that could not be created while preparing a cache path.
#[derive(Debug)]
pub struct DirFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Cache rooted at a directory (the working directory for the CLI).
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
    policy: PathPolicy,
}

impl Cache {
    pub fn new(root: impl Into<PathBuf>, policy: PathPolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    /// Map a URL to its cache location. Pure; touches nothing on disk.
    pub fn locate(&self, url: &ParsedUrl) -> Result<CacheLocation, CacheError> {
        CacheLocation::for_url(url, self.policy)
    }

    /// Absolute (root-joined) path of the cached file.
    pub fn file_path(&self, location: &CacheLocation) -> PathBuf {
        self.root.join(location.relative_path())
    }

    /// Size of the cached copy, or `None` on a miss.
    pub fn probe(&self, location: &CacheLocation) -> Option<u64> {
        let path = self.file_path(location);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Some(meta.len()),
            Ok(_) => {
                tracing::debug!(path = %path.display(), "cache path exists but is not a file");
                None
            }
            Err(_) => None,
        }
    }

    /// Create every missing directory leading to `location`, one segment at a time.
    ///
    /// Failures are logged and returned but do not stop the walk: a later
    /// segment may still be usable, and opening the output file is the real
    /// writability check.
    pub fn prepare_dirs(&self, location: &CacheLocation) -> Vec<DirFailure> {
        let mut failures = Vec::new();
        let mut current = self.root.clone();
        for segment in location.dirs() {
            current.push(segment);
            if current.is_dir() {
                continue;
            }
            match fs::create_dir(&current) {
                Ok(()) => tracing::debug!(dir = %current.display(), "created cache directory"),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && current.is_dir() => {}
                Err(error) => {
                    tracing::warn!(dir = %current.display(), %error, "failed to create cache directory");
                    failures.push(DirFailure {
                        path: current.clone(),
                        error,
                    });
                }
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn cache_in(dir: &Path) -> Cache {
        Cache::new(dir, PathPolicy::default())
    }

    #[test]
    fn probe_miss_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let url = ParsedUrl::parse("http://example.com/a/b.html").unwrap();
        let loc = cache.locate(&url).unwrap();
        assert_eq!(cache.probe(&loc), None);

        assert!(cache.prepare_dirs(&loc).is_empty());
        fs::write(cache.file_path(&loc), b"hello").unwrap();
        assert_eq!(cache.probe(&loc), Some(5));
    }

    #[test]
    fn empty_file_is_a_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let loc = cache
            .locate(&ParsedUrl::parse("http://example.com").unwrap())
            .unwrap();
        cache.prepare_dirs(&loc);
        fs::write(cache.file_path(&loc), b"").unwrap();
        assert_eq!(cache.probe(&loc), Some(0));
    }

    #[test]
    fn directory_at_file_path_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let loc = cache
            .locate(&ParsedUrl::parse("http://example.com/x").unwrap())
            .unwrap();
        fs::create_dir_all(cache.file_path(&loc)).unwrap();
        assert_eq!(cache.probe(&loc), None);
    }

    #[test]
    fn prepare_dirs_creates_nested_segments() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let loc = cache
            .locate(&ParsedUrl::parse("http://example.com/a/b/c/d.txt").unwrap())
            .unwrap();
        assert!(cache.prepare_dirs(&loc).is_empty());
        assert!(dir.path().join("example.com/a/b/c").is_dir());
        assert!(!dir.path().join("example.com/a/b/c/d.txt").exists());
        // Second run finds everything in place.
        assert!(cache.prepare_dirs(&loc).is_empty());
    }

    #[test]
    fn prepare_dirs_reports_but_continues() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        // A plain file where a directory should go.
        fs::write(dir.path().join("example.com"), b"not a dir").unwrap();
        let loc = cache
            .locate(&ParsedUrl::parse("http://example.com/a/b").unwrap())
            .unwrap();
        let failures = cache.prepare_dirs(&loc);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].path, dir.path().join("example.com"));
    }
}
