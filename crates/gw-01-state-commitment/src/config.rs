//! # State Commitment Configuration

use serde::{Deserialize, Serialize};

/// Identifier of the singleton canonical tree in the persistence store.
pub const DEFAULT_TREE_ID: &str = "current";

/// Configuration for the commitment service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitmentConfig {
    /// Persistence row id for the canonical tree.
    pub tree_id: String,

    /// Persist the canonical tree after each committed update.
    ///
    /// Persistence is best-effort either way: a failed save is logged and
    /// retried on the next commit, never rolled back into.
    pub cache_enabled: bool,
}

impl Default for CommitmentConfig {
    fn default() -> Self {
        Self {
            tree_id: DEFAULT_TREE_ID.to_string(),
            cache_enabled: true,
        }
    }
}

impl CommitmentConfig {
    /// Create a config for testing (separate tree id, caching on).
    pub fn for_testing() -> Self {
        Self {
            tree_id: "test".to_string(),
            cache_enabled: true,
        }
    }
}
