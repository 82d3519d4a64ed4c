//! Sequential writer for one cache entry.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::TEMP_SUFFIX;

/// Streams a response body into a temp file beside the entry.
///
/// Exactly one of `commit` or `discard` finishes the entry; dropping an
/// unfinished writer removes the temp file as well.
pub struct EntryWriter {
    file: NamedTempFile,
    final_path: PathBuf,
    written: u64,
}

impl EntryWriter {
    /// Create a fresh temp file in the directory of `final_path`, which must
    /// already exist. Existing files there are never opened.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let dir = match final_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut prefix = OsString::from(".");
        if let Some(name) = final_path.file_name() {
            prefix.push(name);
            prefix.push(".");
        }
        let file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        tracing::trace!(path = %file.path().display(), "opened temp entry");
        Ok(EntryWriter {
            file,
            final_path: final_path.to_path_buf(),
            written: 0,
        })
    }

    /// Body bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    /// Sync and rename the temp file onto the entry path. Returns the entry size.
    /// On failure the temp file is removed.
    pub fn commit(self) -> io::Result<u64> {
        self.file.as_file().sync_all()?;
        self.file
            .persist(&self.final_path)
            .map_err(|e| e.error)?;
        Ok(self.written)
    }

    /// Close and delete the temp file.
    pub fn discard(self) {
        let path = self.file.path().to_path_buf();
        if let Err(error) = self.file.close() {
            tracing::warn!(path = %path.display(), %error, "failed to remove partial cache entry");
        }
    }
}

impl Write for EntryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
