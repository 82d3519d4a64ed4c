pub mod config;
pub mod logging;

pub mod cache;
pub mod fetch;
pub mod http;
pub mod storage;
pub mod url_model;

pub use fetch::{FetchError, FetchObserver, FetchOutcome, Fetcher, Source};
pub use url_model::ParsedUrl;
