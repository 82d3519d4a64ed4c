//! Minimal HTTP/1.0 origin server for integration tests.
//!
//! Answers every connection with the same canned bytes and then closes the
//! connection, which is how HTTP/1.0 ends a body. Requests are recorded so
//! tests can check what went over the wire and how often.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct OriginOptions {
    /// Write the response in pieces of this many bytes, flushing between them.
    pub write_step: Option<usize>,
}

pub struct Origin {
    pub port: u16,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Origin {
    /// `http://127.0.0.1:<port><path>`
    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Request heads received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// `HTTP/1.0 200 OK` with a Content-Length header and `body`.
pub fn ok_response(body: &[u8]) -> Vec<u8> {
    let mut out = format!(
        "HTTP/1.0 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\n\r\n",
        body.len()
    )
    .into_bytes();
    out.extend_from_slice(body);
    out
}

/// Starts a server in a background thread that answers with `response`.
/// The server runs until the process exits.
pub fn start(response: Vec<u8>) -> Origin {
    start_with_options(response, OriginOptions::default())
}

pub fn start_with_options(response: Vec<u8>, opts: OriginOptions) -> Origin {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let response = Arc::new(response);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let response = Arc::clone(&response);
            let recorded = Arc::clone(&recorded);
            thread::spawn(move || handle(stream, &response, &recorded, opts));
        }
    });
    Origin { port, requests }
}

fn handle(
    mut stream: std::net::TcpStream,
    response: &[u8],
    recorded: &Mutex<Vec<String>>,
    opts: OriginOptions,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    recorded
        .lock()
        .unwrap()
        .push(String::from_utf8_lossy(&head).into_owned());

    match opts.write_step {
        Some(step) => {
            for piece in response.chunks(step.max(1)) {
                if stream.write_all(piece).is_err() || stream.flush().is_err() {
                    return;
                }
            }
        }
        None => {
            let _ = stream.write_all(response);
        }
    }
}
