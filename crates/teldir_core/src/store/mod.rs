//! Record file storage for the directory.
//!
//! # Responsibility
//! - Own the directory file handle for the whole session.
//! - Map 1-based positions to byte slots and mutate them.
//!
//! # Invariants
//! - The first line of the file is always `HEADER_LINE`.
//! - Positions outside `1..=len` fail before any byte is read or written.
//! - After any whole-file rewrite the store holds the handle of the new file.

use crate::codec::record::CodecError;
use crate::model::entry::{Entry, EntryValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod file_store;
mod open;

pub use file_store::FileDirectoryStore;
pub use open::{open_store, open_store_at};

/// 1-based index of an entry, header excluded.
pub type Position = usize;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from directory store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Directory file cannot be opened or created.
    StorageUnavailable { path: PathBuf, source: io::Error },
    /// Position is not in `1..=len`.
    OutOfRange { position: Position, len: usize },
    /// Scratch file for a rewrite cannot be created or written.
    TempFileUnavailable(io::Error),
    Io(io::Error),
    /// File content does not follow the record format.
    InvalidData(String),
    Validation(EntryValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable { path, source } => {
                write!(f, "directory file `{}` is unavailable: {source}", path.display())
            }
            Self::OutOfRange { position, len } => {
                if *len == 0 {
                    write!(f, "position {position} is out of range: the directory is empty")
                } else {
                    write!(f, "position {position} is out of range: expected 1..={len}")
                }
            }
            Self::TempFileUnavailable(err) => write!(f, "unable to use temporary file: {err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid directory file: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable { source, .. } => Some(source),
            Self::TempFileUnavailable(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::OutOfRange { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<EntryValidationError> for StoreError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CodecError> for StoreError {
    fn from(value: CodecError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// How an existing directory file is treated on open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenMode {
    /// Create or truncate, then write a fresh header.
    #[default]
    Truncate,
    /// Open or create without truncation and index existing records.
    Persist,
}

impl OpenMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Truncate => "truncate",
            Self::Persist => "persist",
        }
    }
}

/// Session-scoped counters kept by a store instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCounters {
    /// Label for the next insert prompt; not tied to positions.
    pub next_entry_number: usize,
    /// Successful deletes since open.
    pub deletes: usize,
}

/// Position-addressed storage contract for directory entries.
pub trait DirectoryStore {
    /// Appends `entry` and returns its position.
    fn insert(&mut self, entry: &Entry) -> StoreResult<Position>;
    fn get(&mut self, position: Position) -> StoreResult<Entry>;
    /// Replaces the entry at `position`; count and order are unchanged.
    fn update(&mut self, position: Position, entry: &Entry) -> StoreResult<()>;
    /// Removes the entry at `position` and returns it. Later entries shift down.
    fn delete(&mut self, position: Position) -> StoreResult<Entry>;
    fn list(&mut self) -> StoreResult<Vec<Entry>>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn session(&self) -> SessionCounters;
}
