//! Cache entry file lifecycle.
//!
//! Bodies are streamed into an exclusively created temp file next to the
//! entry and renamed onto the entry path only after a 200 response
//! completed, so the prober never sees a half-written or rolled-back entry.
//! The temp file is always a fresh file: it never opens, truncates or
//! removes a file another URL already cached.

mod writer;

pub use writer::EntryWriter;

/// Suffix of in-flight entry files (`.<name>.XXXXXX.webcache-tmp`).
pub const TEMP_SUFFIX: &str = ".webcache-tmp";
