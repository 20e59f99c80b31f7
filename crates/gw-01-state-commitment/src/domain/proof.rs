//! # ICS-23 Proof Types
//!
//! Existence and non-existence proofs over the fixed-depth tree, plus the
//! verification fold that recomputes a root from a proof path.
//!
//! Wire encoding notes: byte fields serialize as lowercase hex strings, the
//! proof key as the hex of its UTF-8 bytes, matching the JSON shape the
//! counterparty verifier accepts alongside protobuf proofs.

use crate::domain::errors::StateCommitmentError;
use crate::domain::tree::TREE_DEPTH;
use serde::{Deserialize, Serialize};
use shared_crypto::{inner_hash, leaf_hash};
use shared_types::Hash32;

/// ICS-23 `HashOp::SHA256`.
const HASH_OP_SHA256: u32 = 1;

/// ICS-23 `HashOp::NO_HASH` / `LengthOp::NO_PREFIX`.
const OP_NONE: u32 = 0;

/// Leaf op descriptor for this commitment scheme.
///
/// The leaf commits to `sha256(0x00 || sha256(value))`: the value is
/// pre-hashed, the key is bound by the path rather than the preimage, and no
/// length prefixing is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafSpec {
    /// Hash applied to the assembled leaf preimage.
    pub hash: u32,
    /// Hash applied to the key before hashing (none; the key is not part of
    /// the preimage).
    pub prehash_key: u32,
    /// Hash applied to the value before hashing.
    pub prehash_value: u32,
    /// Length op (none).
    pub length: u32,
    /// Domain-separation prefix of the leaf preimage.
    #[serde(with = "hex_bytes")]
    pub prefix: Vec<u8>,
}

impl Default for LeafSpec {
    fn default() -> Self {
        Self {
            hash: HASH_OP_SHA256,
            prehash_key: OP_NONE,
            prehash_value: HASH_OP_SHA256,
            length: OP_NONE,
            prefix: vec![0x00],
        }
    }
}

/// One step of a proof path.
///
/// - current node is the **left** child: `prefix = 0x01`, `suffix = sibling`
/// - current node is the **right** child: `prefix = 0x01 || sibling`,
///   `suffix` empty
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerOp {
    /// Hash op for this step (always SHA-256 here).
    pub hash: u32,
    /// Bytes hashed before the current node hash.
    #[serde(with = "hex_bytes")]
    pub prefix: Vec<u8>,
    /// Bytes hashed after the current node hash.
    #[serde(with = "hex_bytes")]
    pub suffix: Vec<u8>,
}

impl InnerOp {
    /// Step where the current node is the left child and `sibling` sits on
    /// the right.
    pub fn left(sibling: Vec<u8>) -> Self {
        Self {
            hash: HASH_OP_SHA256,
            prefix: vec![0x01],
            suffix: sibling,
        }
    }

    /// Step where the current node is the right child; `prefix` already
    /// carries `0x01 || sibling`.
    pub fn right(prefix: Vec<u8>) -> Self {
        Self {
            hash: HASH_OP_SHA256,
            prefix,
            suffix: Vec::new(),
        }
    }
}

/// Proof that a key is present with a given value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistenceProof {
    /// The IBC path being proven.
    #[serde(with = "utf8_hex")]
    pub key: String,
    /// The committed value bytes.
    #[serde(with = "hex_bytes")]
    pub value: Vec<u8>,
    /// Leaf op descriptor.
    pub leaf: LeafSpec,
    /// One inner op per tree level, leaf to root.
    pub path: Vec<InnerOp>,
}

/// Proof that a key is absent.
///
/// In this fixed-depth scheme absence is committed as the empty value at the
/// key's own path, so the witness rides in `left` as an existence-shaped
/// proof with an empty value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonExistenceProof {
    /// The absent key.
    #[serde(with = "utf8_hex")]
    pub key: String,
    /// Existence-shaped witness for the empty value on the key's path.
    pub left: Option<ExistenceProof>,
    /// Unused in this scheme; kept for ICS-23 shape compatibility.
    pub right: Option<ExistenceProof>,
}

/// Fold a leaf value up through a proof path and return the implied root.
///
/// Rejects paths that are not exactly 64 steps or whose inner ops are not
/// encoded the way this scheme emits them. The fold applies the same
/// zero-propagation as the tree, so witnesses for empty values reproduce
/// the root of trees with untouched sibling subtrees.
pub fn compute_root_from_path(
    value: &[u8],
    path: &[InnerOp],
) -> Result<Hash32, StateCommitmentError> {
    if path.len() != TREE_DEPTH {
        return Err(StateCommitmentError::MalformedProof(format!(
            "expected {} path steps, got {}",
            TREE_DEPTH,
            path.len()
        )));
    }

    let mut current = leaf_hash(value);
    for (depth, op) in path.iter().enumerate() {
        if !op.suffix.is_empty() {
            // Current node is the left child.
            if op.prefix != [0x01] {
                return Err(StateCommitmentError::MalformedProof(format!(
                    "invalid left-child prefix at depth {depth}"
                )));
            }
            let sibling: Hash32 = op.suffix.as_slice().try_into().map_err(|_| {
                StateCommitmentError::MalformedProof(format!(
                    "invalid sibling length at depth {depth}"
                ))
            })?;
            current = inner_hash(&current, &sibling);
        } else {
            // Current node is the right child.
            if op.prefix.len() != 33 || op.prefix[0] != 0x01 {
                return Err(StateCommitmentError::MalformedProof(format!(
                    "invalid right-child prefix at depth {depth}"
                )));
            }
            let sibling: Hash32 = op.prefix[1..].try_into().map_err(|_| {
                StateCommitmentError::MalformedProof(format!(
                    "invalid sibling length at depth {depth}"
                ))
            })?;
            current = inner_hash(&sibling, &current);
        }
    }
    Ok(current)
}

/// Serde helper: `Vec<u8>` as a lowercase hex string.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helper: `String` as the hex of its UTF-8 bytes.
mod utf8_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(key: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(key.as_bytes()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        String::from_utf8(bytes).map_err(serde::de::Error::custom)
    }
}
