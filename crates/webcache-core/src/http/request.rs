//! HTTP/1.0 GET request rendering.

use std::fmt;
use std::io::{self, Write};

use crate::url_model::ParsedUrl;

/// `GET <path> HTTP/1.0` plus a `Host` header, CRLF throughout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    text: String,
}

impl GetRequest {
    pub fn for_url(url: &ParsedUrl) -> Self {
        let text = format!("GET {} HTTP/1.0\r\nHost: {}\r\n\r\n", url.path(), url.host());
        GetRequest { text }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Write the whole request and flush.
    pub fn send<W: Write>(&self, stream: &mut W) -> io::Result<()> {
        stream.write_all(self.as_bytes())?;
        stream.flush()
    }
}

impl fmt::Display for GetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
