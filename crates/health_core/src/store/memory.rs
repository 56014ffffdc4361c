//! In-process record store.

use super::{Record, RecordStore, StoreResult};
use std::sync::{Mutex, PoisonError};

/// Keeps one collection in memory. Useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl RecordStore for MemoryStore {
    fn read_all(&self) -> StoreResult<Vec<Record>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.clone())
    }

    fn write_all(&self, records: &[Record]) -> StoreResult<()> {
        let mut guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = records.to_vec();
        Ok(())
    }
}
