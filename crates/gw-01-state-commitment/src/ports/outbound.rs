//! # Outbound Ports
//!
//! Traits for external dependencies (durable store, on-chain state readers,
//! denom trace table). Persistence I/O is the only place this crate blocks
//! on the outside world, so these are the only async surfaces.

use crate::domain::errors::StateCommitmentError;
use crate::domain::snapshot::TreeSnapshot;
use crate::domain::tree::Ics23MerkleTree;
use async_trait::async_trait;
use shared_types::{hash_from_hex, Hash32};
use std::time::{SystemTime, UNIX_EPOCH};

/// One persisted row of the tree store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeRecord {
    /// Root tag stored alongside the blob, 64 lowercase hex characters.
    pub root: String,
    /// Gzip-compressed JSON snapshot.
    pub leaves_gzip: Vec<u8>,
    /// Unix seconds of the last save.
    pub updated_at: u64,
}

/// Durable tree persistence - outbound port.
///
/// `load` implementations must verify the stored root tag against a
/// recomputation from the decoded leaves and answer `None` on any mismatch
/// or decode failure: a corrupted cache is a cache miss, never an answer.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Fetch the raw record for a tree id, if one exists.
    async fn fetch(&self, id: &str) -> Result<Option<TreeRecord>, StateCommitmentError>;

    /// Upsert the record for a tree id.
    async fn put(&self, id: &str, record: TreeRecord) -> Result<(), StateCommitmentError>;

    /// Load and verify the tree stored under `id`.
    ///
    /// Decodes the blob, rebuilds the tree, and recomputes its root. A row
    /// whose stored tag disagrees with the recomputation -- or that fails to
    /// decode at all -- is discarded as a cache miss.
    async fn load(
        &self,
        id: &str,
    ) -> Result<Option<(Ics23MerkleTree, Hash32)>, StateCommitmentError> {
        let Some(record) = self.fetch(id).await? else {
            return Ok(None);
        };

        let decoded = TreeSnapshot::from_gzip(&record.leaves_gzip)
            .and_then(|snapshot| Ok((snapshot.restore()?, snapshot)));
        let (mut tree, snapshot) = match decoded {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to decode cached tree, ignoring cache");
                return Ok(None);
            }
        };

        let computed = tree.root()?;
        let stored = hash_from_hex(&record.root).ok();
        if stored != Some(computed) || snapshot.root != record.root {
            tracing::warn!(
                id,
                stored = %record.root,
                computed = %shared_types::hash_to_hex(&computed),
                "cached tree root mismatch, ignoring cache"
            );
            return Ok(None);
        }

        Ok(Some((tree, computed)))
    }

    /// Snapshot a tree and persist it under `id`, returning the saved root.
    async fn save(
        &self,
        tree: &mut Ics23MerkleTree,
        id: &str,
    ) -> Result<Hash32, StateCommitmentError> {
        let snapshot = TreeSnapshot::capture(tree)?;
        let root = tree.root()?;
        let record = TreeRecord {
            root: snapshot.root.clone(),
            leaves_gzip: snapshot.to_gzip()?,
            updated_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };
        self.put(id, record).await?;
        Ok(root)
    }
}

/// Reader of the authoritative on-chain commitment root - outbound port.
///
/// Backed by the handler UTXO datum in production; the confirmation path
/// uses it to check a staged root against what the chain actually accepted.
#[async_trait]
pub trait HostRootReader: Send + Sync {
    /// Current `ibc_state_root` committed on-chain.
    async fn current_root(&self) -> Result<Hash32, StateCommitmentError>;
}

/// Denom trace finalization - outbound port.
///
/// Voucher mints and refunds record their trace hashes provisionally at
/// build time; confirmation stamps them with the final transaction hash,
/// atomically with the tree commit.
#[async_trait]
pub trait DenomTraceFinalizer: Send + Sync {
    /// Attach the confirmed transaction hash to the given trace hashes.
    async fn set_tx_hash_for_traces(
        &self,
        trace_hashes: &[String],
        tx_hash: &str,
    ) -> Result<(), StateCommitmentError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock on-chain root reader for testing.
#[derive(Debug, Default)]
pub struct MockHostRootReader {
    pub(crate) root: std::sync::Mutex<Hash32>,
    /// Should return errors?
    pub should_fail: bool,
}

impl MockHostRootReader {
    /// Reader that always answers the given root.
    pub fn with_root(root: Hash32) -> Self {
        Self {
            root: std::sync::Mutex::new(root),
            should_fail: false,
        }
    }

    /// Change the answered root (simulates a new confirmed transaction).
    pub fn set_root(&self, root: Hash32) {
        *self.root.lock().expect("mock root lock poisoned") = root;
    }
}

#[async_trait]
impl HostRootReader for MockHostRootReader {
    async fn current_root(&self) -> Result<Hash32, StateCommitmentError> {
        if self.should_fail {
            return Err(StateCommitmentError::Store(
                "host state unavailable".to_string(),
            ));
        }
        Ok(*self.root.lock().expect("mock root lock poisoned"))
    }
}

/// Mock denom trace finalizer recording every call.
#[derive(Debug, Default)]
pub struct MockDenomTraceFinalizer {
    calls: std::sync::Mutex<Vec<(Vec<String>, String)>>,
    /// Should return errors?
    pub should_fail: bool,
}

impl MockDenomTraceFinalizer {
    /// Finalizer that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalizer that rejects every call.
    pub fn failing() -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    /// Recorded `(trace_hashes, tx_hash)` invocations.
    pub fn calls(&self) -> Vec<(Vec<String>, String)> {
        self.calls.lock().expect("mock trace lock poisoned").clone()
    }
}

#[async_trait]
impl DenomTraceFinalizer for MockDenomTraceFinalizer {
    async fn set_tx_hash_for_traces(
        &self,
        trace_hashes: &[String],
        tx_hash: &str,
    ) -> Result<(), StateCommitmentError> {
        if self.should_fail {
            return Err(StateCommitmentError::DenomTrace(
                "trace table unavailable".to_string(),
            ));
        }
        self.calls
            .lock()
            .expect("mock trace lock poisoned")
            .push((trace_hashes.to_vec(), tx_hash.to_string()));
        Ok(())
    }
}
