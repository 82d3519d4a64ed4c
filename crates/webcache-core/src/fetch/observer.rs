//! Fetch events for the console shell.

use std::path::Path;

use crate::http::GetRequest;

/// Receives progress events from a fetch. All methods default to no-ops.
pub trait FetchObserver {
    /// The URL was found in the cache; `size` is the entry length.
    fn cache_hit(&mut self, _path: &Path, _size: u64) {}

    /// About to write the request to the socket.
    fn request_sent(&mut self, _request: &GetRequest) {}

    /// Raw response bytes, headers included, in arrival order. On a cache hit
    /// this is a synthesized header followed by the entry contents.
    fn response_chunk(&mut self, _chunk: &[u8]) {}

    /// The server answered with something other than 200 and the entry at
    /// `path` was removed.
    fn rolled_back(&mut self, _path: &Path, _status_code: u16) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FetchObserver for NoopObserver {}
