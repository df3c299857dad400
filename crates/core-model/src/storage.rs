//! File storage collaborator: ordered line ingestion and whole-file write.
//!
//! Failures are recoverable by design; callers surface them on the status
//! bar and the editing session continues with its dirty counter intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("can't open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("can't save {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no filename set")]
    NoFilename,
}

/// Read a file as ordered lines, stripping each trailing `\n` / `\r\n`.
///
/// Rows are `String`-backed, so the file must be valid UTF-8; anything
/// else surfaces as a recoverable open error on the status bar rather
/// than a lossy re-encode.
pub fn read_lines(path: &Path) -> Result<Vec<String>, StorageError> {
    let content = fs::read_to_string(path).map_err(|source| StorageError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    let mut lines: Vec<String> = Vec::new();
    for line in content.split('\n') {
        lines.push(line.strip_suffix('\r').unwrap_or(line).to_string());
    }
    // A trailing newline produces one empty fragment past the last row.
    if content.ends_with('\n') {
        lines.pop();
    }
    Ok(lines)
}

/// Write the full serialized buffer, truncating any existing file.
/// Returns the byte count written.
pub fn write_all(path: &Path, bytes: &[u8]) -> Result<usize, StorageError> {
    let wrap = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = fs::File::create(path).map_err(wrap)?;
    file.write_all(bytes).map_err(wrap)?;
    file.flush().map_err(wrap)?;
    Ok(bytes.len())
}
