//! TCP transport to the origin server.
//!
//! The fetcher only depends on the [`Connector`] trait, so it can be driven
//! against in-memory streams and a cache hit never builds a transport.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("could not resolve host {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("no IPv4 address found for host {host}")]
    NoIpv4Address { host: String },

    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Opens a byte stream to `(host, port)`.
///
/// The stream is closed when dropped; callers hold it for exactly one fetch.
pub trait Connector {
    type Stream: Read + Write;

    fn connect(&self, host: &str, port: u16) -> Result<Self::Stream, ConnectError>;
}

/// Plain blocking TCP over IPv4.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    read_timeout: Option<Duration>,
}

impl TcpConnector {
    /// `read_timeout = None` blocks on reads indefinitely. A zero duration
    /// cannot be set on a socket and is treated as `None`.
    pub fn new(read_timeout: Option<Duration>) -> Self {
        Self {
            read_timeout: read_timeout.filter(|t| !t.is_zero()),
        }
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&self, host: &str, port: u16) -> Result<TcpStream, ConnectError> {
        let addr = resolve_ipv4(host, port)?;
        tracing::debug!(%host, %addr, "connecting");
        let stream =
            TcpStream::connect(addr).map_err(|source| ConnectError::Connect { addr, source })?;
        if self.read_timeout.is_some() {
            stream
                .set_read_timeout(self.read_timeout)
                .map_err(|source| ConnectError::Connect { addr, source })?;
        }
        Ok(stream)
    }
}

/// First IPv4 address for `host`. No fallback to other addresses.
fn resolve_ipv4(host: &str, port: u16) -> Result<SocketAddr, ConnectError> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ConnectError::Resolve {
            host: host.to_string(),
            source,
        })?;
    addrs
        .into_iter()
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| ConnectError::NoIpv4Address {
            host: host.to_string(),
        })
}
