//! Console echo of a fetch.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use webcache_core::http::GetRequest;
use webcache_core::{FetchObserver, FetchOutcome};

/// Echoes the request, the raw response and a byte total to `out`.
///
/// Observer callbacks cannot fail, so the first write error is kept and
/// returned by [`Console::finish`].
pub struct Console<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn emit(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(bytes).and_then(|()| self.out.flush()) {
            self.error = Some(e);
        }
    }

    /// Print the total and surface any earlier write error.
    pub fn finish(mut self, outcome: &FetchOutcome) -> Result<W> {
        let total = format!("\n Total response bytes: {}\n", outcome.bytes_transferred);
        self.emit(total.as_bytes());
        match self.error.take() {
            Some(e) => Err(e).context("write to stdout"),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> FetchObserver for Console<W> {
    fn cache_hit(&mut self, _path: &Path, _size: u64) {
        self.emit(b"File is given from local filesystem\n");
    }

    fn request_sent(&mut self, request: &GetRequest) {
        let text = format!("HTTP request =\n{}\nLEN = {}\n", request, request.len());
        self.emit(text.as_bytes());
    }

    fn response_chunk(&mut self, chunk: &[u8]) {
        self.emit(chunk);
    }

    fn rolled_back(&mut self, path: &Path, status_code: u16) {
        let status = match status_code {
            0 => "unrecognized status".to_string(),
            code => format!("status {}", code),
        };
        let text = format!("\nServer answered with {}; removed {}\n", status, path.display());
        self.emit(text.as_bytes());
    }
}
