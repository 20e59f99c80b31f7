//! # Tree Snapshot Codec
//!
//! The persisted form of the canonical tree: a JSON object
//! `{ "leaves": { key: hex(value) }, "root": hex }`, gzip-compressed into a
//! single blob. The root rides along as an integrity tag that loaders check
//! against a recomputation before trusting the leaves.

use crate::domain::errors::StateCommitmentError;
use crate::domain::tree::Ics23MerkleTree;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Serializable tree state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Present leaves, values hex-encoded.
    pub leaves: BTreeMap<String, String>,
    /// Root at snapshot time, 64 lowercase hex characters.
    pub root: String,
}

impl TreeSnapshot {
    /// Capture a snapshot of a tree, computing its current root.
    pub fn capture(tree: &mut Ics23MerkleTree) -> Result<Self, StateCommitmentError> {
        let root = tree.root_hex()?;
        let leaves = tree
            .entries()
            .map(|(k, v)| (k.to_string(), hex::encode(v)))
            .collect();
        Ok(Self { leaves, root })
    }

    /// Rebuild a tree from the snapshot's leaves.
    ///
    /// The stored root tag is *not* checked here; loaders compare it against
    /// a recomputation (see the store adapters) so that corrupted rows are
    /// discarded rather than trusted.
    pub fn restore(&self) -> Result<Ics23MerkleTree, StateCommitmentError> {
        let mut tree = Ics23MerkleTree::new();
        for (key, value_hex) in &self.leaves {
            let value = hex::decode(value_hex).map_err(|e| {
                StateCommitmentError::Snapshot(format!("invalid hex for key '{key}': {e}"))
            })?;
            tree.set(key, &value);
        }
        Ok(tree)
    }

    /// Gzip the JSON encoding of this snapshot.
    pub fn to_gzip(&self) -> Result<Vec<u8>, StateCommitmentError> {
        let json = serde_json::to_vec(self)
            .map_err(|e| StateCommitmentError::Snapshot(format!("encode: {e}")))?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&json)
            .and_then(|_| encoder.finish())
            .map_err(|e| StateCommitmentError::Snapshot(format!("gzip: {e}")))
    }

    /// Decode a gzip blob back into a snapshot.
    pub fn from_gzip(blob: &[u8]) -> Result<Self, StateCommitmentError> {
        let mut json = Vec::new();
        GzDecoder::new(blob)
            .read_to_end(&mut json)
            .map_err(|e| StateCommitmentError::Snapshot(format!("gunzip: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| StateCommitmentError::Snapshot(format!("decode: {e}")))
    }
}
