//! # In-Memory Tree Store
//!
//! Ephemeral [`TreeStore`] used in tests and by deployments that rebuild
//! from chain state on every start.

use crate::domain::errors::StateCommitmentError;
use crate::ports::outbound::{TreeRecord, TreeStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mutex-guarded map of tree records.
#[derive(Debug, Default)]
pub struct MemoryTreeStore {
    records: Mutex<HashMap<String, TreeRecord>>,
}

impl MemoryTreeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().expect("memory store poisoned").len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite the stored root tag for a record, leaving the blob alone.
    ///
    /// Test hook for simulating a corrupted row.
    pub fn corrupt_root(&self, id: &str, root: &str) {
        if let Some(record) = self
            .records
            .lock()
            .expect("memory store poisoned")
            .get_mut(id)
        {
            record.root = root.to_string();
        }
    }
}

#[async_trait]
impl TreeStore for MemoryTreeStore {
    async fn fetch(&self, id: &str) -> Result<Option<TreeRecord>, StateCommitmentError> {
        Ok(self
            .records
            .lock()
            .expect("memory store poisoned")
            .get(id)
            .cloned())
    }

    async fn put(&self, id: &str, record: TreeRecord) -> Result<(), StateCommitmentError> {
        self.records
            .lock()
            .expect("memory store poisoned")
            .insert(id.to_string(), record);
        Ok(())
    }
}
