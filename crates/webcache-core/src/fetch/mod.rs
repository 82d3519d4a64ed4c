//! Fetch orchestration: decompose, probe, then serve from cache or fetch,
//! persist and commit/roll back.
//!
//! ```text
//! Init → Decomposed ─┬─ CacheHit ──────────────────────────────── outcome(source=cache)
//!                    └─ CacheMiss → Connecting → Requesting → Receiving ─┬─ Committed
//!                                                                        └─ RolledBack
//! ```
//!
//! Nothing is retried. The socket and the entry file are owned by the fetch
//! and released on every exit path.

mod error;
mod observer;

pub use error::FetchError;
pub use observer::{FetchObserver, NoopObserver};

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::cache::{Cache, CacheLocation};
use crate::http::{self, Connector, GetRequest, STATUS_OK};
use crate::storage::EntryWriter;
use crate::url_model::ParsedUrl;

/// Receive buffer size when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Where the bytes of a fetch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Network,
}

/// Result of one completed fetch (headers fully received or cache replayed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// 200 on success; for a rolled-back fetch the code from the status line, or 0.
    pub status_code: u16,
    /// Header plus body bytes seen (synthesized header on a cache hit).
    pub bytes_transferred: u64,
    pub source: Source,
    pub url: ParsedUrl,
    /// Mapped entry path. Holds the resource only when [`is_success`](Self::is_success).
    pub local_path: PathBuf,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }

    /// Local copy of the resource, if there is one.
    pub fn cached_path(&self) -> Option<&Path> {
        self.is_success().then_some(self.local_path.as_path())
    }
}

/// Single-shot fetcher over a cache and a connector.
#[derive(Debug, Clone)]
pub struct Fetcher<C> {
    cache: Cache,
    connector: C,
    chunk_size: usize,
}

impl<C: Connector> Fetcher<C> {
    pub fn new(cache: Cache, connector: C) -> Self {
        Self {
            cache,
            connector,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Read buffer size for the socket and for cache replay. Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Fetch `raw_url`, from the cache when possible.
    ///
    /// A non-200 answer is `Ok` with `is_success() == false` and no entry left
    /// on disk. Every `Err` is fatal; none of them leave a partial entry.
    pub fn fetch(
        &self,
        raw_url: &str,
        observer: &mut dyn FetchObserver,
    ) -> Result<FetchOutcome, FetchError> {
        let url = ParsedUrl::parse(raw_url)?;
        let location = self.cache.locate(&url)?;
        let local_path = self.cache.file_path(&location);

        match self.cache.probe(&location) {
            Some(size) => {
                tracing::info!(%url, path = %local_path.display(), size, "cache hit");
                self.serve_cached(url, local_path, size, observer)
            }
            None => {
                tracing::info!(%url, path = %local_path.display(), "cache miss");
                self.fetch_network(url, &location, local_path, observer)
            }
        }
    }

    fn serve_cached(
        &self,
        url: ParsedUrl,
        local_path: PathBuf,
        size: u64,
        observer: &mut dyn FetchObserver,
    ) -> Result<FetchOutcome, FetchError> {
        let read_err = |source: io::Error| FetchError::CacheRead {
            path: local_path.clone(),
            source,
        };
        let mut file = File::open(&local_path).map_err(read_err)?;

        observer.cache_hit(&local_path, size);
        let header = format!("HTTP/1.0 200 OK\r\nContent-Length: {}\r\n\r\n", size);
        observer.response_chunk(header.as_bytes());

        let mut total = header.len() as u64;
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            let n = match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_err(e)),
            };
            observer.response_chunk(&buf[..n]);
            total += n as u64;
        }

        Ok(FetchOutcome {
            status_code: STATUS_OK,
            bytes_transferred: total,
            source: Source::Cache,
            url,
            local_path,
        })
    }

    fn fetch_network(
        &self,
        url: ParsedUrl,
        location: &CacheLocation,
        local_path: PathBuf,
        observer: &mut dyn FetchObserver,
    ) -> Result<FetchOutcome, FetchError> {
        let mut stream = self
            .connector
            .connect(url.host(), url.port())
            .map_err(|source| FetchError::Connection {
                host: url.host().to_string(),
                port: url.port(),
                source,
            })?;

        let request = GetRequest::for_url(&url);
        observer.request_sent(&request);
        request.send(&mut stream).map_err(FetchError::RequestWrite)?;

        let failures = self.cache.prepare_dirs(location);
        if !failures.is_empty() {
            tracing::debug!(count = failures.len(), "continuing with partially prepared cache path");
        }
        let mut entry = EntryWriter::create(&local_path).map_err(|source| FetchError::CacheWrite {
            path: local_path.clone(),
            source,
        })?;

        let received = match http::receive(&mut stream, &mut entry, self.chunk_size, |chunk| {
            observer.response_chunk(chunk)
        }) {
            Ok(received) => received,
            Err(e) => {
                tracing::warn!(
                    %url,
                    temp = %entry.temp_path().display(),
                    error = %e,
                    "transfer failed, removing partial entry"
                );
                entry.discard();
                return Err(FetchError::from_receive(e, &local_path));
            }
        };
        drop(stream);

        if received.is_ok() {
            entry.commit().map_err(|source| FetchError::CacheWrite {
                path: local_path.clone(),
                source,
            })?;
            tracing::info!(
                %url,
                path = %local_path.display(),
                body_bytes = received.body_bytes,
                "committed cache entry"
            );
        } else {
            entry.discard();
            observer.rolled_back(&local_path, received.status_code);
            tracing::info!(%url, status_code = received.status_code, "non-200 response, entry rolled back");
        }

        Ok(FetchOutcome {
            status_code: received.status_code,
            bytes_transferred: received.bytes_transferred,
            source: Source::Network,
            url,
            local_path,
        })
    }
}
