//! Record store contracts and file-backed persistence.
//!
//! # Responsibility
//! - Define the two-operation storage seam used by repositories.
//! - Keep file format and I/O details out of repository/service code.
//!
//! # Invariants
//! - `read_all` returns records in persisted order.
//! - `write_all` replaces the whole collection; readers never observe a
//!   partially written file.
//! - An empty or missing collection reads as an empty sequence.

use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// One persisted row: field name to JSON value, insertion ordered.
pub type Record = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Corrupt {
        path: PathBuf,
        message: String,
    },
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Corrupt { path, message } => {
                write!(f, "corrupt collection `{}`: {message}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { .. } => None,
            Self::Encode(err) => Some(err),
        }
    }
}

/// Whole-collection storage capability.
pub trait RecordStore {
    /// Loads every record of the collection in persisted order.
    fn read_all(&self) -> StoreResult<Vec<Record>>;
    /// Replaces the persisted collection with `records`.
    fn write_all(&self, records: &[Record]) -> StoreResult<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn read_all(&self) -> StoreResult<Vec<Record>> {
        (**self).read_all()
    }

    fn write_all(&self, records: &[Record]) -> StoreResult<()> {
        (**self).write_all(records)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn read_all(&self) -> StoreResult<Vec<Record>> {
        (**self).read_all()
    }

    fn write_all(&self, records: &[Record]) -> StoreResult<()> {
        (**self).write_all(records)
    }
}
