//! URL decomposition.
//!
//! Splits an `http://host[:port]/path` string into its parts. The path is kept
//! byte-for-byte as given (no percent-decoding, no `..` folding) because it is
//! both the request target and the cache key.

mod error;

pub use error::UrlError;

use std::fmt;
use std::str::FromStr;

/// Only plain HTTP is spoken.
pub const HTTP_PREFIX: &str = "http://";

/// Port used when the URL does not name one.
pub const DEFAULT_PORT: u16 = 80;

/// Path substituted when the URL ends at the host or at a bare `/`.
pub const INDEX_PATH: &str = "/index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
}

/// A decomposed URL. Built once per fetch and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    scheme: Scheme,
    host: String,
    port: u16,
    path: String,
}

impl ParsedUrl {
    /// Decompose `raw` into scheme, host, port and path.
    ///
    /// # Examples
    ///
    /// - `http://example.com` → host `example.com`, port 80, path `/index.html`
    /// - `http://example.com:8080/x` → port 8080, path `/x`
    /// - `example.com/x` → `UrlError::MissingScheme`
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let rest = raw
            .strip_prefix(HTTP_PREFIX)
            .ok_or_else(|| UrlError::MissingScheme {
                url: raw.to_string(),
            })?;

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => (host, parse_port(raw, port)?),
            None => (authority, DEFAULT_PORT),
        };
        validate_host(raw, host)?;

        let path = if path.is_empty() || path == "/" {
            INDEX_PATH.to_string()
        } else {
            if path.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(UrlError::InvalidPath {
                    url: raw.to_string(),
                });
            }
            path.to_string()
        };

        Ok(ParsedUrl {
            scheme: Scheme::Http,
            host: host.to_string(),
            port,
            path,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Request target; always starts with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl FromStr for ParsedUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParsedUrl::parse(s)
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", HTTP_PREFIX, self.host)?;
        if self.port != DEFAULT_PORT {
            write!(f, ":{}", self.port)?;
        }
        f.write_str(&self.path)
    }
}

fn parse_port(raw: &str, port: &str) -> Result<u16, UrlError> {
    let invalid = || UrlError::InvalidPort {
        url: raw.to_string(),
        port: port.to_string(),
    };
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(n) => Ok(n),
    }
}

fn validate_host(raw: &str, host: &str) -> Result<(), UrlError> {
    if host.is_empty() {
        return Err(UrlError::EmptyHost {
            url: raw.to_string(),
        });
    }
    if let Some(ch) = host
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_')))
    {
        return Err(UrlError::InvalidHost {
            url: raw.to_string(),
            ch,
        });
    }
    Ok(())
}
