//! # State Commitment Errors
//!
//! Two failure families, deliberately kept apart:
//!
//! - **invalid argument** -- the caller asked for something the current tree
//!   cannot answer (proof for a missing key, non-existence proof for a
//!   present one). Expected operational traffic; reject and move on.
//! - **integrity violation** -- the tree, the store, or the chain disagree
//!   about state that must be identical (index collision, root mismatch,
//!   missing pending update). The affected workflow must halt rather than
//!   fall back to a weaker guarantee.

use thiserror::Error;

/// State commitment error types.
#[derive(Debug, Error)]
pub enum StateCommitmentError {
    /// Two distinct keys hashed to the same 64-bit tree index.
    ///
    /// Probability is birthday-bound negligible, but an actual collision
    /// would silently merge two IBC paths, so it is a fatal integrity error.
    #[error("key index collision at {index:#018x}: '{key_a}' vs '{key_b}'")]
    KeyIndexCollision {
        /// First key occupying the index.
        key_a: String,
        /// Second key hashing to the same index.
        key_b: String,
        /// The shared 64-bit index.
        index: u64,
    },

    /// A proof was requested against an empty tree.
    #[error("cannot generate proof: tree is empty")]
    EmptyTree,

    /// An existence proof was requested for an absent key.
    #[error("cannot generate proof: key '{0}' not found in tree")]
    KeyNotFound(String),

    /// A non-existence proof was requested for a present key.
    #[error("cannot generate non-existence proof: key '{0}' exists in tree")]
    KeyExists(String),

    /// A proof path had the wrong shape (length or inner-op encoding).
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// A committed or loaded root did not match the recomputed one.
    #[error("state root mismatch: expected {expected}, got {actual}")]
    RootMismatch {
        /// Root the caller expected (hex).
        expected: String,
        /// Root actually observed (hex).
        actual: String,
    },

    /// A confirmed transaction had no registered pending tree update.
    ///
    /// Finalization must never be skipped silently; a confirmation with no
    /// matching staged update means the gateway lost track of its own state.
    #[error("no pending tree update found for tx {tx_hash} (on-chain root {root})")]
    PendingUpdateNotFound {
        /// Confirmed transaction hash.
        tx_hash: String,
        /// Root observed on-chain at confirmation time.
        root: String,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot codec failure: {0}")]
    Snapshot(String),

    /// The persistence store failed.
    #[error("tree store failure: {0}")]
    Store(String),

    /// Denom trace finalization failed.
    #[error("denom trace finalization failure: {0}")]
    DenomTrace(String),
}

impl StateCommitmentError {
    /// True for failures that mean the system itself is inconsistent, as
    /// opposed to a rejectable request.
    pub fn is_internal(&self) -> bool {
        match self {
            Self::KeyIndexCollision { .. }
            | Self::RootMismatch { .. }
            | Self::PendingUpdateNotFound { .. }
            | Self::Snapshot(_)
            | Self::Store(_)
            | Self::DenomTrace(_) => true,
            Self::EmptyTree
            | Self::KeyNotFound(_)
            | Self::KeyExists(_)
            | Self::MalformedProof(_) => false,
        }
    }
}
