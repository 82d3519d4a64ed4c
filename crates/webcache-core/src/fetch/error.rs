//! Fatal fetch failures.
//!
//! A non-200 response is not in here: it is rolled back and returned as a
//! normal [`FetchOutcome`](super::FetchOutcome).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::CacheError;
use crate::http::{ConnectError, ReceiveError};
use crate::url_model::UrlError;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Input was not a usable `http://` URL. Nothing was attempted.
    #[error(transparent)]
    MalformedUrl(#[from] UrlError),

    /// URL maps outside the cache root. Nothing was attempted.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// DNS lookup or TCP connect failed. The cache was not touched.
    #[error("connection to {host}:{port} failed: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: ConnectError,
    },

    /// The request could not be written to the socket. The cache was not touched.
    #[error("sending request failed: {0}")]
    RequestWrite(#[source] io::Error),

    /// The socket failed mid-transfer. The partial entry was removed.
    #[error("transfer aborted: {0}")]
    TransportRead(#[source] io::Error),

    /// The server closed the connection before the header block ended.
    #[error("server closed the connection before end of headers ({received} bytes received)")]
    IncompleteResponse { received: u64 },

    #[error("response headers exceed {limit} bytes")]
    HeadersTooLarge { limit: usize },

    /// The cache entry could not be created, written or committed.
    #[error("cache write to {} failed: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A cache hit could not be read back.
    #[error("cache read from {} failed: {source}", path.display())]
    CacheRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub(crate) fn from_receive(err: ReceiveError, entry_path: &std::path::Path) -> Self {
        match err {
            ReceiveError::Read(e) => FetchError::TransportRead(e),
            ReceiveError::IncompleteHeaders { received } => {
                FetchError::IncompleteResponse { received }
            }
            ReceiveError::HeadersTooLarge { limit } => FetchError::HeadersTooLarge { limit },
            ReceiveError::Sink(source) => FetchError::CacheWrite {
                path: entry_path.to_path_buf(),
                source,
            },
        }
    }
}
