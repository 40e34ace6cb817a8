//! Storage error types.

use std::path::PathBuf;
use thiserror::Error;

/// A single line failed to decode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The line did not split into the expected number of fields.
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// A numeric field did not parse.
    #[error("field '{field}' is not a valid number: '{value}'")]
    InvalidNumber {
        field: &'static str,
        value: String,
    },
}

/// Errors from the file-backed record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stored line is corrupt. The store cannot be trusted; this is a
    /// fatal load failure, not a per-record skip.
    #[error("malformed record in '{path}' at line {line}: {source}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: DecodeError,
    },

    /// The backing file could not be opened, read, or written.
    ///
    /// The legacy system swallowed write failures (the store simply did
    /// not persist); surfacing them is a deliberate upgrade.
    #[error("storage unavailable at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Creates a malformed-record error with file context.
    pub fn malformed(path: impl Into<PathBuf>, line: usize, source: DecodeError) -> Self {
        Self::MalformedRecord {
            path: path.into(),
            line,
            source,
        }
    }

    /// Creates an I/O error with file context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when the program cannot safely continue.
    ///
    /// A malformed store is a data-integrity failure; I/O errors may be
    /// transient (permissions, disk full) but still abort the current
    /// operation.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. })
    }
}
