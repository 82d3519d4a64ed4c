//! Raw-socket HTTP/1.0: request rendering, transport, response reception.
//!
//! Only what a single `GET` needs. No keep-alive, no chunked encoding, no
//! redirects; the server ends the body by closing the connection.

mod request;
mod response;
mod transport;

pub use request::GetRequest;
pub use response::{
    receive, ReceiveError, Received, HEADER_END, MAX_HEADER_BYTES, STATUS_OK, STATUS_PROBE_LEN,
};
pub use transport::{ConnectError, Connector, TcpConnector};
