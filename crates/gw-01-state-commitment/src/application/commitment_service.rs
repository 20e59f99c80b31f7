//! # Commitment Service
//!
//! Owner of the canonical tree. One logical writer at a time: the on-chain
//! handler carries a single state token, so updates are serialized at the
//! protocol level and this service only needs interior locking for the
//! pending-update registry, where concurrent transaction builds race.
//!
//! ## Lifecycle of an update
//!
//! 1. `stage` -- simulate the writes on a clone of the canonical tree,
//!    compute the prospective root, register the staged update under the
//!    provisional transaction hash.
//! 2. The transaction is signed and submitted by the outer layers.
//! 3. `confirm` -- look up the staged update (by hash, falling back to the
//!    observed on-chain root), verify the chain really landed on the
//!    expected root, replay the writes, finalize denom traces, swap the
//!    canonical tree, persist best-effort.
//!
//! A transaction that never confirms simply leaves its staged update parked
//! in the registry; canonical state is untouched.

use crate::config::CommitmentConfig;
use crate::domain::errors::StateCommitmentError;
use crate::domain::staging::{
    PendingTreeUpdate, PendingUpdateRegistry, StateUpdateKind, TreeUpdate,
};
use crate::domain::tree::Ics23MerkleTree;
use crate::ports::outbound::{DenomTraceFinalizer, HostRootReader, TreeStore};
use shared_types::{hash_to_hex, Hash32};
use std::sync::Arc;

/// Canonical-tree owner orchestrating staging, confirmation, and
/// persistence.
pub struct CommitmentService {
    /// Configuration.
    config: CommitmentConfig,
    /// The canonical tree mirroring on-chain state.
    canonical: Ics23MerkleTree,
    /// Staged, not-yet-confirmed updates.
    pending: PendingUpdateRegistry,
    /// Durable store.
    store: Arc<dyn TreeStore>,
    /// Authoritative on-chain root.
    roots: Arc<dyn HostRootReader>,
    /// Denom trace table.
    denom_traces: Arc<dyn DenomTraceFinalizer>,
}

impl CommitmentService {
    /// Create a service with an empty canonical tree.
    pub fn new(
        config: CommitmentConfig,
        store: Arc<dyn TreeStore>,
        roots: Arc<dyn HostRootReader>,
        denom_traces: Arc<dyn DenomTraceFinalizer>,
    ) -> Self {
        Self {
            config,
            canonical: Ics23MerkleTree::new(),
            pending: PendingUpdateRegistry::new(),
            store,
            roots,
            denom_traces,
        }
    }

    /// Adopt a cached tree if one exists and matches the on-chain root.
    ///
    /// Returns `true` when the cache was adopted. `false` means the caller
    /// must rebuild the tree from chain state (and typically `replace` it
    /// here afterwards); starting to serve proofs off a tree the chain does
    /// not vouch for is never an option.
    pub async fn load_or_init(&mut self) -> Result<bool, StateCommitmentError> {
        if !self.config.cache_enabled {
            return Ok(false);
        }

        let Some((tree, cached_root)) = self.store.load(&self.config.tree_id).await? else {
            return Ok(false);
        };

        let on_chain_root = self.roots.current_root().await?;
        if cached_root != on_chain_root {
            tracing::warn!(
                cached = %hash_to_hex(&cached_root),
                on_chain = %hash_to_hex(&on_chain_root),
                "cached tree root does not match on-chain root, rebuilding from chain"
            );
            return Ok(false);
        }

        tracing::info!(root = %hash_to_hex(&cached_root), "loaded IBC state tree from cache");
        self.canonical = tree;
        Ok(true)
    }

    /// Replace the canonical tree wholesale (bootstrap from chain state) and
    /// persist the replacement.
    pub async fn replace(&mut self, tree: Ics23MerkleTree) -> Result<Hash32, StateCommitmentError> {
        self.canonical = tree;
        let root = self.canonical.root()?;
        self.persist_best_effort().await;
        Ok(root)
    }

    /// Current canonical root.
    pub fn canonical_root(&mut self) -> Result<Hash32, StateCommitmentError> {
        self.canonical.root()
    }

    /// Read access to the canonical tree (proof queries).
    pub fn tree_mut(&mut self) -> &mut Ics23MerkleTree {
        &mut self.canonical
    }

    /// Number of staged updates awaiting confirmation.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Simulate an update against the canonical tree and stage it.
    ///
    /// Returns the root the chain is expected to land on once the
    /// corresponding transaction confirms. Canonical state is not touched.
    pub fn stage(
        &mut self,
        tx_hash: &str,
        kind: StateUpdateKind,
        update: TreeUpdate,
        denom_trace_hashes: Vec<String>,
    ) -> Result<Hash32, StateCommitmentError> {
        let mut working = self.canonical.clone();
        update.apply_to(&mut working);
        let expected_new_root = working.root()?;

        tracing::debug!(
            tx_hash,
            kind = %kind,
            writes = update.len(),
            expected_root = %hash_to_hex(&expected_new_root),
            "staged tree update"
        );

        self.pending.register(
            tx_hash,
            PendingTreeUpdate {
                expected_new_root,
                denom_trace_hashes,
                update,
                kind,
            },
        );
        Ok(expected_new_root)
    }

    /// Finalize a confirmed transaction's staged update.
    ///
    /// Every failure before the canonical swap aborts the whole
    /// finalization: no partial denom-trace stamping, no partial commit.
    /// Only the trailing persistence step is best-effort.
    pub async fn confirm(&mut self, tx_hash: &str) -> Result<Hash32, StateCommitmentError> {
        let observed_root = self.roots.current_root().await?;

        let pending = match self.pending.take(tx_hash) {
            Some(update) => update,
            None => match self.pending.take_by_root(&observed_root) {
                Some((provisional, update)) => {
                    tracing::warn!(
                        tx_hash,
                        provisional,
                        "pending update resolved by root; tx hash drifted after signing"
                    );
                    update
                }
                None => {
                    return Err(StateCommitmentError::PendingUpdateNotFound {
                        tx_hash: tx_hash.to_string(),
                        root: hash_to_hex(&observed_root),
                    })
                }
            },
        };

        // Never finalize on an unverified root.
        if pending.expected_new_root != observed_root {
            return Err(StateCommitmentError::RootMismatch {
                expected: hash_to_hex(&pending.expected_new_root),
                actual: hash_to_hex(&observed_root),
            });
        }

        // Replay the writes and make sure the canonical tree really lands on
        // the same root before anything becomes visible.
        let mut working = self.canonical.clone();
        pending.update.apply_to(&mut working);
        let new_root = working.root()?;
        if new_root != pending.expected_new_root {
            return Err(StateCommitmentError::RootMismatch {
                expected: hash_to_hex(&pending.expected_new_root),
                actual: hash_to_hex(&new_root),
            });
        }

        if pending.kind.finalizes_denom_traces() && !pending.denom_trace_hashes.is_empty() {
            self.denom_traces
                .set_tx_hash_for_traces(&pending.denom_trace_hashes, tx_hash)
                .await?;
        }

        self.canonical = working;
        tracing::info!(
            tx_hash,
            kind = %pending.kind,
            root = %hash_to_hex(&new_root),
            "committed tree update"
        );

        self.persist_best_effort().await;
        Ok(new_root)
    }

    /// Persist the canonical tree; failure is logged, never propagated.
    ///
    /// The in-memory tree is already correct at this point, and the next
    /// successful commit will retry the save.
    async fn persist_best_effort(&mut self) {
        if !self.config.cache_enabled {
            return;
        }
        if let Err(e) = self.store.save(&mut self.canonical, &self.config.tree_id).await {
            tracing::warn!(error = %e, "failed to persist IBC state tree cache");
        }
    }
}
