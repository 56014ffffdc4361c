//! JSON file record store.
//!
//! # Responsibility
//! - Persist one collection as a pretty-printed JSON array of objects.
//! - Replace the file through a same-directory temp file so a failed write
//!   leaves the previous content intact.
//!
//! # Invariants
//! - Missing, empty or whitespace-only files read as an empty collection.
//! - Any other content that is not an array of objects is `Corrupt`.

use super::{Record, RecordStore, StoreError, StoreResult};
use log::{debug, error, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

const INDENT: &[u8] = b"    ";

/// File-backed store holding exactly one collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Binds the collection at `path` without touching the filesystem.
    ///
    /// A missing file reads as empty; the first write creates it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the collection at `path`, creating the file and its parent
    /// directory when missing.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = non_empty_parent(&path) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let created = !path.exists();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| {
                error!(
                    "event=store_open module=store status=error path={} error={}",
                    path.display(),
                    source
                );
                StoreError::Io {
                    path: path.clone(),
                    source,
                }
            })?;

        info!(
            "event=store_open module=store status=ok path={} created={}",
            path.display(),
            created
        );
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, message: impl Into<String>) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            message: message.into(),
        }
    }
}

impl RecordStore for JsonFileStore {
    fn read_all(&self) -> StoreResult<Vec<Record>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                error!(
                    "event=store_read module=store status=error path={} error={}",
                    self.path.display(),
                    source
                );
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let value: Value = serde_json::from_str(&content).map_err(|err| self.corrupt(err.to_string()))?;
        let Value::Array(items) = value else {
            return Err(self.corrupt("top-level value is not an array"));
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                _ => Err(self.corrupt(format!("element {index} is not an object"))),
            })
            .collect::<StoreResult<Vec<_>>>()?;

        debug!(
            "event=store_read module=store status=ok path={} records={}",
            self.path.display(),
            records.len()
        );
        Ok(records)
    }

    fn write_all(&self, records: &[Record]) -> StoreResult<()> {
        let started_at = Instant::now();
        let dir = non_empty_parent(&self.path).unwrap_or_else(|| Path::new("."));
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        fs::create_dir_all(dir).map_err(io_error)?;
        let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
        {
            let mut serializer =
                Serializer::with_formatter(&mut file, PrettyFormatter::with_indent(INDENT));
            records
                .serialize(&mut serializer)
                .map_err(StoreError::Encode)?;
        }
        file.write_all(b"\n").map_err(io_error)?;
        file.as_file().sync_all().map_err(io_error)?;

        if let Err(err) = file.persist(&self.path) {
            error!(
                "event=store_write module=store status=error path={} duration_ms={} error={}",
                self.path.display(),
                started_at.elapsed().as_millis(),
                err.error
            );
            return Err(io_error(err.error));
        }

        debug!(
            "event=store_write module=store status=ok path={} records={} duration_ms={}",
            self.path.display(),
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|parent| !parent.as_os_str().is_empty())
}
