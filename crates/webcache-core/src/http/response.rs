//! Streaming response reception.
//!
//! Reads the server's byte stream chunk by chunk until the server closes the
//! connection. Everything up to the first CRLF CRLF is the header block;
//! everything after goes straight to the sink as it arrives.

use std::io::{self, Read, Write};
use thiserror::Error;

/// End-of-headers marker.
pub const HEADER_END: &[u8] = b"\r\n\r\n";

/// The status line is only inspected once this many bytes have been seen.
pub const STATUS_PROBE_LEN: u64 = 15;

/// Upper bound on the header block.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

pub const STATUS_OK: u16 = 200;

const OK_PREFIXES: [&[u8]; 2] = [b"HTTP/1.0 200", b"HTTP/1.1 200"];

#[derive(Debug, Error)]
pub enum ReceiveError {
    #[error("read from server failed: {0}")]
    Read(#[source] io::Error),

    #[error("connection closed before end of response headers ({received} bytes received)")]
    IncompleteHeaders { received: u64 },

    #[error("response headers exceed {limit} bytes")]
    HeadersTooLarge { limit: usize },

    #[error("writing response body failed: {0}")]
    Sink(#[source] io::Error),
}

/// What a completed receive produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Received {
    /// Header and body bytes read from the stream.
    pub bytes_transferred: u64,
    /// Bytes handed to the sink.
    pub body_bytes: u64,
    /// 200, another code read from the status line, or 0 if none was recognized.
    pub status_code: u16,
}

impl Received {
    pub fn is_ok(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

/// Drain `reader` until end-of-stream, writing the body into `sink`.
///
/// `on_chunk` sees every raw chunk (headers included) in arrival order.
/// Memory use is bounded by `chunk_size` plus the header block.
pub fn receive<R, W, F>(
    reader: &mut R,
    sink: &mut W,
    chunk_size: usize,
    mut on_chunk: F,
) -> Result<Received, ReceiveError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(&[u8]),
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut header: Vec<u8> = Vec::new();
    let mut in_body = false;
    let mut total: u64 = 0;
    let mut body: u64 = 0;
    let mut status_code = 0;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReceiveError::Read(e)),
        };
        let chunk = &buf[..n];
        on_chunk(chunk);
        total += n as u64;

        if in_body {
            sink.write_all(chunk).map_err(ReceiveError::Sink)?;
            body += n as u64;
            continue;
        }

        // The marker may straddle the previous read.
        let search_from = header.len().saturating_sub(HEADER_END.len() - 1);
        header.extend_from_slice(chunk);
        match find_header_end(&header[search_from..]) {
            Some(pos) => {
                let end = search_from + pos + HEADER_END.len();
                if end > MAX_HEADER_BYTES {
                    return Err(ReceiveError::HeadersTooLarge {
                        limit: MAX_HEADER_BYTES,
                    });
                }
                let rest = &header[end..];
                if !rest.is_empty() {
                    sink.write_all(rest).map_err(ReceiveError::Sink)?;
                    body += rest.len() as u64;
                }
                header.truncate(end);
                status_code = classify_status(&header, total);
                tracing::debug!(status_code, header_bytes = end, "response headers received");
                in_body = true;
            }
            None if header.len() > MAX_HEADER_BYTES => {
                return Err(ReceiveError::HeadersTooLarge {
                    limit: MAX_HEADER_BYTES,
                });
            }
            None => {}
        }
    }

    if !in_body {
        return Err(ReceiveError::IncompleteHeaders { received: total });
    }
    sink.flush().map_err(ReceiveError::Sink)?;

    Ok(Received {
        bytes_transferred: total,
        body_bytes: body,
        status_code,
    })
}

fn find_header_end(haystack: &[u8]) -> Option<usize> {
    haystack.windows(HEADER_END.len()).position(|w| w == HEADER_END)
}

/// 200 only for an exact `HTTP/1.0 200` or `HTTP/1.1 200` prefix. Otherwise the
/// code from the status line when it has one (reporting only), else 0; a 200
/// under any other version never counts as success.
fn classify_status(header: &[u8], observed: u64) -> u16 {
    if observed < STATUS_PROBE_LEN {
        return 0;
    }
    if OK_PREFIXES.iter().any(|p| header.starts_with(p)) {
        return STATUS_OK;
    }
    let line_end = header
        .windows(2)
        .position(|w| w == b"\r\n")
        .unwrap_or(header.len());
    let line = String::from_utf8_lossy(&header[..line_end]);
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(version), Some(code))
            if version.starts_with("HTTP/")
                && code.len() == 3
                && code.bytes().all(|b| b.is_ascii_digit()) =>
        {
            match code.parse::<u16>() {
                Ok(STATUS_OK) | Err(_) => 0,
                Ok(n) => n,
            }
        }
        _ => 0,
    }
}
