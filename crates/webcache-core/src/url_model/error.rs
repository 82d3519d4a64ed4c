//! Error type for URL decomposition.

use thiserror::Error;

/// Why a URL string could not be decomposed. Every variant is a malformed URL;
/// no fetch is attempted and nothing touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// The input does not begin with `http://`. The scheme is never guessed.
    #[error("malformed URL {url:?}: expected an http:// prefix")]
    MissingScheme { url: String },

    /// Nothing between `http://` and the first `/` or `:`.
    #[error("malformed URL {url:?}: empty host")]
    EmptyHost { url: String },

    /// Host contains a character that cannot appear in a DNS name or IPv4 literal.
    #[error("malformed URL {url:?}: invalid character {ch:?} in host")]
    InvalidHost { url: String, ch: char },

    /// Port after `:` is missing, not a number, or outside 1..=65535.
    #[error("malformed URL {url:?}: invalid port {port:?}")]
    InvalidPort { url: String, port: String },

    /// Path holds whitespace or control bytes that would corrupt the request line.
    #[error("malformed URL {url:?}: path contains whitespace or control characters")]
    InvalidPath { url: String },
}
