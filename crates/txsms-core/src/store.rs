//! Record storage
//!
//! Records are append-only. The HTTP layer holds a `dyn RecordStore` so a
//! persistent backend can replace the in-memory one without touching handlers.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::TransactionRecord;

pub trait RecordStore: Send + Sync {
    /// Append a record. Duplicates are kept.
    fn append(&self, record: TransactionRecord);

    /// Snapshot of all records in insertion order
    fn all(&self) -> Vec<TransactionRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<TransactionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoned locks are recovered: a push either completes or leaves the Vec as it was
    fn read(&self) -> RwLockReadGuard<'_, Vec<TransactionRecord>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<TransactionRecord>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl RecordStore for MemoryStore {
    fn append(&self, record: TransactionRecord) {
        self.write().push(record);
    }

    fn all(&self) -> Vec<TransactionRecord> {
        self.read().clone()
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}
