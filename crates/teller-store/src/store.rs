//! File-backed record store.
//!
//! One store per backing file. Every call is a full-file pass: loads
//! read and decode every line; persists truncate and rewrite the whole
//! file. There is no caching between calls and no file locking.

use crate::codec::{decode, encode, Record};
use crate::error::StoreError;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A store of `R` records backed by one flat text file.
///
/// # Example
///
/// ```no_run
/// use teller_store::{Client, FileStore};
///
/// # fn main() -> Result<(), teller_store::StoreError> {
/// let store: FileStore<Client> = FileStore::new("CLIENTS.txt");
///
/// let mut clients = store.load_all()?;
/// if let Some(i) = FileStore::find_index(&clients, "A1") {
///     clients[i].balance += 50.0;
///     store.persist_all(&clients)?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore<R> {
    /// Backing file path.
    path: PathBuf,
    _record: PhantomData<R>,
}

impl<R: Record> FileStore<R> {
    /// Creates a store over the given file path.
    ///
    /// The file is not opened here; a missing file simply means "no
    /// records yet".
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every record from the backing file, in file order.
    ///
    /// A missing file yields an empty list. Decoding is fail-fast: the
    /// first malformed line aborts the whole load — the program cannot
    /// safely continue with a partially trusted store.
    ///
    /// # Errors
    ///
    /// [`StoreError::MalformedRecord`] on a corrupt line,
    /// [`StoreError::Io`] when the file exists but cannot be read.
    pub fn load_all(&self) -> Result<Vec<R>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no backing file yet, empty store");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| StoreError::io(&self.path, e))?;
            let record =
                decode::<R>(&line).map_err(|e| StoreError::malformed(&self.path, index + 1, e))?;
            records.push(record);
        }

        debug!(path = %self.path.display(), count = records.len(), "loaded records");
        Ok(records)
    }

    /// Rewrites the backing file with every non-tombstoned record.
    ///
    /// The write truncates and rewrites unconditionally: no atomic
    /// rename, no backup. A crash mid-write can leave a truncated file;
    /// this is a known limitation of the format, kept as-is.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] when the file cannot be written (permissions,
    /// disk full).
    pub fn persist_all(&self, records: &[R]) -> Result<(), StoreError> {
        let mut contents = String::new();
        let mut written = 0usize;
        for record in records.iter().filter(|r| !r.is_deleted()) {
            contents.push_str(&encode(record));
            contents.push('\n');
            written += 1;
        }

        fs::write(&self.path, contents).map_err(|e| StoreError::io(&self.path, e))?;

        debug!(
            path = %self.path.display(),
            written,
            dropped = records.len() - written,
            "persisted records"
        );
        Ok(())
    }

    /// Appends one record as a new line at the end of the file.
    ///
    /// Used by the add flow; the file is created if missing.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] when the file cannot be opened or written.
    pub fn append(&self, record: &R) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;

        writeln!(file, "{}", encode(record)).map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = %self.path.display(), key = record.key(), "appended record");
        Ok(())
    }

    /// Linear scan for the first record whose key equals `key` exactly.
    #[must_use]
    pub fn find_index(records: &[R], key: &str) -> Option<usize> {
        records.iter().position(|record| record.key() == key)
    }
}
