//! # ICS-23 Fixed-Depth Merkle Tree
//!
//! The off-chain mirror of the on-chain IBC state commitment. The handler
//! contract maintains the identical scheme over the same 64-level tree, so
//! every hash computed here must match the on-chain result bit for bit.
//!
//! ## Tree structure
//!
//! - A leaf lives at the 64-bit index derived from `sha256(key)`; bit `d` of
//!   the index picks left (0) or right (1) at depth `d`.
//! - Leaves hash as `sha256(0x00 || sha256(value))`, inner nodes as
//!   `sha256(0x01 || left || right)`, and empty subtrees collapse to the
//!   all-zero sentinel.
//! - Only non-empty nodes are materialized, so a rebuild is proportional to
//!   the number of live keys, not to 2^64.
//!
//! Because node hashes depend only on child hashes, the root is a function
//! of the *set* of present key/value pairs -- insertion order is irrelevant.

use crate::domain::errors::StateCommitmentError;
use crate::domain::proof::{ExistenceProof, InnerOp, LeafSpec, NonExistenceProof};
use shared_crypto::{inner_hash, key_index, leaf_hash};
use shared_types::{hash_to_hex, Hash32, EMPTY_HASH};
use std::collections::{BTreeMap, HashMap};

/// Number of levels between the leaves and the root.
pub const TREE_DEPTH: usize = 64;

/// ICS-23 compatible Merkle tree over IBC state.
///
/// Keys are IBC paths (`"clients/07-tendermint-0/clientState"`), values are
/// the committed bytes. The root is recomputed lazily: mutations mark the
/// tree dirty and the next [`root`](Self::root) call rebuilds the sparse
/// level maps bottom-up.
#[derive(Clone, Debug)]
pub struct Ics23MerkleTree {
    /// Present leaves. An empty value is never stored; it means deletion.
    leaves: BTreeMap<String, Vec<u8>>,
    /// Cached sparse node maps, one per level 0..=64, valid while clean.
    levels: Vec<HashMap<u64, Hash32>>,
    /// Cached root, valid while clean.
    root: Hash32,
    /// Set by every mutation, cleared by a rebuild.
    dirty: bool,
}

impl Default for Ics23MerkleTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Ics23MerkleTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            leaves: BTreeMap::new(),
            levels: Vec::new(),
            root: EMPTY_HASH,
            dirty: true,
        }
    }

    /// Insert or update a key-value pair.
    ///
    /// An empty value is treated as a deletion, never stored as a leaf.
    pub fn set(&mut self, key: &str, value: &[u8]) {
        if value.is_empty() {
            self.delete(key);
            return;
        }
        self.leaves.insert(key.to_string(), value.to_vec());
        self.dirty = true;
    }

    /// Get the value stored at a key.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.leaves.get(key).map(Vec::as_slice)
    }

    /// Remove a key.
    pub fn delete(&mut self, key: &str) {
        if self.leaves.remove(key).is_some() {
            self.dirty = true;
        }
    }

    /// Number of present leaves.
    pub fn size(&self) -> usize {
        self.leaves.len()
    }

    /// True when no leaves are present.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Iterate over the present key/value pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.leaves.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Compute (or return the cached) Merkle root.
    ///
    /// The empty tree's root is exactly 32 zero bytes.
    pub fn root(&mut self) -> Result<Hash32, StateCommitmentError> {
        self.ensure_built()?;
        Ok(self.root)
    }

    /// The root as 64 lowercase hex characters.
    pub fn root_hex(&mut self) -> Result<String, StateCommitmentError> {
        Ok(hash_to_hex(&self.root()?))
    }

    /// Sibling hashes along a key's path, one per level, leaf to root.
    ///
    /// Empty-subtree siblings come back as the zero sentinel. The path is
    /// defined for absent keys too, which is what makes the list usable as
    /// an update witness for inserts.
    pub fn siblings(&mut self, key: &str) -> Result<[Hash32; TREE_DEPTH], StateCommitmentError> {
        self.ensure_built()?;
        let index = key_index(key);
        let mut siblings = [EMPTY_HASH; TREE_DEPTH];
        for (depth, slot) in siblings.iter_mut().enumerate() {
            let sibling_index = (index >> depth) ^ 1;
            if let Some(hash) = self.levels[depth].get(&sibling_index) {
                *slot = *hash;
            }
        }
        Ok(siblings)
    }

    /// Generate an ICS-23 existence proof for a present key.
    ///
    /// The path holds one inner op per level, leaf to root. When the current
    /// node is the left child the sibling rides in the suffix; when it is
    /// the right child the sibling is folded into the prefix.
    pub fn generate_proof(&mut self, key: &str) -> Result<ExistenceProof, StateCommitmentError> {
        if self.leaves.is_empty() {
            return Err(StateCommitmentError::EmptyTree);
        }
        let value = self
            .leaves
            .get(key)
            .cloned()
            .ok_or_else(|| StateCommitmentError::KeyNotFound(key.to_string()))?;

        Ok(ExistenceProof {
            key: key.to_string(),
            value,
            leaf: LeafSpec::default(),
            path: self.path_ops(key)?,
        })
    }

    /// Generate an ICS-23 non-existence proof for an absent key.
    ///
    /// Absence is committed as the empty value at the key's path, so the
    /// witness is an existence-shaped proof of the empty value.
    pub fn generate_non_existence_proof(
        &mut self,
        key: &str,
    ) -> Result<NonExistenceProof, StateCommitmentError> {
        if self.leaves.is_empty() {
            return Err(StateCommitmentError::EmptyTree);
        }
        if self.leaves.contains_key(key) {
            return Err(StateCommitmentError::KeyExists(key.to_string()));
        }

        let witness = ExistenceProof {
            key: key.to_string(),
            value: Vec::new(),
            leaf: LeafSpec::default(),
            path: self.path_ops(key)?,
        };
        Ok(NonExistenceProof {
            key: key.to_string(),
            left: Some(witness),
            right: None,
        })
    }

    /// Verify an existence proof against this tree's current root.
    ///
    /// Recomputes a candidate root by folding the leaf hash up through the
    /// proof path and compares it to the freshly computed root.
    pub fn verify_proof(&mut self, proof: &ExistenceProof) -> Result<bool, StateCommitmentError> {
        let candidate = crate::domain::proof::compute_root_from_path(&proof.value, &proof.path)?;
        Ok(candidate == self.root()?)
    }

    /// Build the inner-op path for a key, present or absent.
    fn path_ops(&mut self, key: &str) -> Result<Vec<InnerOp>, StateCommitmentError> {
        let siblings = self.siblings(key)?;
        let index = key_index(key);
        let mut path = Vec::with_capacity(TREE_DEPTH);
        for (depth, sibling) in siblings.iter().enumerate() {
            let is_right_child = (index >> depth) & 1 == 1;
            if is_right_child {
                let mut prefix = Vec::with_capacity(1 + 32);
                prefix.push(0x01);
                prefix.extend_from_slice(sibling);
                path.push(InnerOp::right(prefix));
            } else {
                path.push(InnerOp::left(sibling.to_vec()));
            }
        }
        Ok(path)
    }

    /// Rebuild the sparse level maps if any mutation happened since the last
    /// build.
    ///
    /// Level 0 holds the leaf hashes keyed by tree index; each level above
    /// derives parents as `inner_hash(child[2p], child[2p+1])`, storing only
    /// non-empty results. Two distinct keys claiming the same index abort
    /// the rebuild.
    fn ensure_built(&mut self) -> Result<(), StateCommitmentError> {
        if !self.dirty && !self.levels.is_empty() {
            return Ok(());
        }

        let mut occupants: HashMap<u64, &str> = HashMap::with_capacity(self.leaves.len());
        let mut level0: HashMap<u64, Hash32> = HashMap::with_capacity(self.leaves.len());
        for (key, value) in &self.leaves {
            let index = key_index(key);
            if let Some(existing) = occupants.insert(index, key) {
                return Err(StateCommitmentError::KeyIndexCollision {
                    key_a: existing.to_string(),
                    key_b: key.clone(),
                    index,
                });
            }
            level0.insert(index, leaf_hash(value));
        }

        let mut levels = Vec::with_capacity(TREE_DEPTH + 1);
        levels.push(level0);
        for depth in 1..=TREE_DEPTH {
            let children = &levels[depth - 1];
            let mut parents: HashMap<u64, Hash32> = HashMap::with_capacity(children.len());
            for child_index in children.keys() {
                let parent_index = child_index >> 1;
                if parents.contains_key(&parent_index) {
                    continue;
                }
                let left = children
                    .get(&(parent_index << 1))
                    .copied()
                    .unwrap_or(EMPTY_HASH);
                let right = children
                    .get(&((parent_index << 1) | 1))
                    .copied()
                    .unwrap_or(EMPTY_HASH);
                let hash = inner_hash(&left, &right);
                if hash != EMPTY_HASH {
                    parents.insert(parent_index, hash);
                }
            }
            levels.push(parents);
        }

        self.root = levels[TREE_DEPTH].get(&0).copied().unwrap_or(EMPTY_HASH);
        self.levels = levels;
        self.dirty = false;
        Ok(())
    }
}
