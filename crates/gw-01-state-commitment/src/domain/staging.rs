//! # Tree Update Staging
//!
//! Writers never mutate the canonical tree directly. A transaction builder
//! simulates its writes against a snapshot, registers the staged update
//! under the provisional transaction hash, and the confirmation path later
//! consumes it exactly once -- or not at all, if the transaction dies.

use crate::domain::tree::Ics23MerkleTree;
use serde::{Deserialize, Serialize};
use shared_types::Hash32;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// The on-chain redeemer case a staged update corresponds to.
///
/// One variant per handler redeemer; matches are exhaustive so a new case
/// cannot be added without the compiler pointing at every site that must
/// handle it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateUpdateKind {
    /// New light client created.
    CreateClient,
    /// Client updated with a verified header (or frozen on misbehaviour).
    UpdateClient,
    /// Connection handshake: init.
    ConnOpenInit,
    /// Connection handshake: try.
    ConnOpenTry,
    /// Connection handshake: ack.
    ConnOpenAck,
    /// Connection handshake: confirm.
    ConnOpenConfirm,
    /// Channel handshake: init.
    ChanOpenInit,
    /// Channel handshake: try.
    ChanOpenTry,
    /// Channel handshake: ack.
    ChanOpenAck,
    /// Channel handshake: confirm.
    ChanOpenConfirm,
    /// Outgoing packet commitment.
    SendPacket,
    /// Incoming packet receipt (may mint vouchers).
    RecvPacket,
    /// Packet acknowledgement.
    AcknowledgePacket,
    /// Packet timeout (may refund vouchers).
    TimeoutPacket,
}

impl StateUpdateKind {
    /// Whether confirming this update finalizes denom trace records.
    ///
    /// Only packet flows that mint or refund vouchers touch the trace table.
    pub fn finalizes_denom_traces(&self) -> bool {
        match self {
            Self::RecvPacket | Self::TimeoutPacket => true,
            Self::CreateClient
            | Self::UpdateClient
            | Self::ConnOpenInit
            | Self::ConnOpenTry
            | Self::ConnOpenAck
            | Self::ConnOpenConfirm
            | Self::ChanOpenInit
            | Self::ChanOpenTry
            | Self::ChanOpenAck
            | Self::ChanOpenConfirm
            | Self::SendPacket
            | Self::AcknowledgePacket => false,
        }
    }
}

impl fmt::Display for StateUpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateClient => "CreateClient",
            Self::UpdateClient => "UpdateClient",
            Self::ConnOpenInit => "ConnOpenInit",
            Self::ConnOpenTry => "ConnOpenTry",
            Self::ConnOpenAck => "ConnOpenAck",
            Self::ConnOpenConfirm => "ConnOpenConfirm",
            Self::ChanOpenInit => "ChanOpenInit",
            Self::ChanOpenTry => "ChanOpenTry",
            Self::ChanOpenAck => "ChanOpenAck",
            Self::ChanOpenConfirm => "ChanOpenConfirm",
            Self::SendPacket => "SendPacket",
            Self::RecvPacket => "RecvPacket",
            Self::AcknowledgePacket => "AcknowledgePacket",
            Self::TimeoutPacket => "TimeoutPacket",
        };
        f.write_str(name)
    }
}

/// An ordered batch of tree writes produced against a canonical snapshot.
///
/// An empty value means deletion, mirroring the tree's own convention.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeUpdate {
    writes: Vec<(String, Vec<u8>)>,
}

impl TreeUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key write.
    pub fn set(&mut self, key: &str, value: &[u8]) -> &mut Self {
        self.writes.push((key.to_string(), value.to_vec()));
        self
    }

    /// Record a key deletion.
    pub fn delete(&mut self, key: &str) -> &mut Self {
        self.writes.push((key.to_string(), Vec::new()));
        self
    }

    /// Apply every write, in order, to a tree.
    pub fn apply_to(&self, tree: &mut Ics23MerkleTree) {
        for (key, value) in &self.writes {
            tree.set(key, value);
        }
    }

    /// Number of recorded writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// True when no writes were recorded.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// A staged, not-yet-canonical tree mutation.
///
/// Consumed exactly once: taking it out of the registry transfers ownership,
/// and committing consumes the value, so a second commit cannot exist.
#[derive(Clone, Debug)]
pub struct PendingTreeUpdate {
    /// Root the canonical tree must have after this update commits.
    pub expected_new_root: Hash32,
    /// Voucher denom trace hashes finalized atomically with the commit.
    pub denom_trace_hashes: Vec<String>,
    /// The staged writes.
    pub update: TreeUpdate,
    /// Redeemer case this update corresponds to.
    pub kind: StateUpdateKind,
}

/// In-flight staged updates keyed by provisional transaction hash.
///
/// Multiple transaction builds may race; the map is mutex-guarded and `take`
/// has remove semantics, so each update can be claimed by exactly one
/// confirmation.
#[derive(Debug, Default)]
pub struct PendingUpdateRegistry {
    inner: Mutex<HashMap<String, PendingTreeUpdate>>,
}

impl PendingUpdateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a staged update under a provisional transaction hash.
    ///
    /// Re-registering the same hash replaces the previous entry; the builder
    /// re-simulates from the current canonical tree each time.
    pub fn register(&self, tx_hash: &str, update: PendingTreeUpdate) {
        let mut map = self.inner.lock().expect("pending update registry poisoned");
        if map.insert(tx_hash.to_string(), update).is_some() {
            tracing::warn!(tx_hash, "replaced previously staged tree update");
        }
    }

    /// Claim the staged update for a transaction hash.
    ///
    /// Exactly-once: a second take for the same hash returns `None`.
    pub fn take(&self, tx_hash: &str) -> Option<PendingTreeUpdate> {
        self.inner
            .lock()
            .expect("pending update registry poisoned")
            .remove(tx_hash)
    }

    /// Claim a staged update by its expected resulting root.
    ///
    /// Fallback for when the provisional hash drifted between build time and
    /// post-signing confirmation. Returns the provisional hash alongside the
    /// update so the caller can log the drift.
    pub fn take_by_root(&self, root: &Hash32) -> Option<(String, PendingTreeUpdate)> {
        let mut map = self.inner.lock().expect("pending update registry poisoned");
        let key = map
            .iter()
            .find(|(_, pending)| pending.expected_new_root == *root)
            .map(|(k, _)| k.clone())?;
        let pending = map.remove(&key)?;
        Some((key, pending))
    }

    /// Number of in-flight staged updates.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("pending update registry poisoned")
            .len()
    }

    /// True when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
