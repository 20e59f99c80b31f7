//! # Commitment Hashing
//!
//! SHA-256 with domain separation tags:
//!
//! - leaves hash as `sha256(0x00 || sha256(value))`
//! - inner nodes hash as `sha256(0x01 || left || right)`
//! - an absent value maps to the all-zero sentinel, and a node whose two
//!   children are both the sentinel is itself the sentinel
//!
//! The zero-propagation rule is what makes the root of an empty subtree --
//! and of the empty tree -- exactly 32 zero bytes.

use sha2::{Digest, Sha256};
use shared_types::{Hash32, EMPTY_HASH};

/// Domain tag prepended to leaf preimages.
const LEAF_PREFIX: u8 = 0x00;

/// Domain tag prepended to inner-node preimages.
const INNER_PREFIX: u8 = 0x01;

/// One-shot SHA-256.
pub fn sha256(data: &[u8]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash a leaf value.
///
/// An empty value is "absent" and hashes to the zero sentinel. Anything else
/// hashes as `sha256(0x00 || sha256(value))` -- the leaf commits to the value
/// only; the key is bound by the path derived from [`key_index`].
pub fn leaf_hash(value: &[u8]) -> Hash32 {
    if value.is_empty() {
        return EMPTY_HASH;
    }
    let value_hash = sha256(value);
    let mut preimage = Vec::with_capacity(1 + 32);
    preimage.push(LEAF_PREFIX);
    preimage.extend_from_slice(&value_hash);
    sha256(&preimage)
}

/// Hash an inner node from its two children.
///
/// Two empty children collapse to the empty sentinel instead of hashing, so
/// node hashes depend only on the set of present leaves beneath them.
pub fn inner_hash(left: &Hash32, right: &Hash32) -> Hash32 {
    if *left == EMPTY_HASH && *right == EMPTY_HASH {
        return EMPTY_HASH;
    }
    let mut preimage = Vec::with_capacity(1 + 32 + 32);
    preimage.push(INNER_PREFIX);
    preimage.extend_from_slice(left);
    preimage.extend_from_slice(right);
    sha256(&preimage)
}

/// Derive the 64-bit tree index for a key.
///
/// The first 8 bytes of `sha256(key)`, read big-endian. Bit `d` of the index
/// (counting from the least significant bit) selects left (0) or right (1)
/// at depth `d` of the fixed 64-level tree.
pub fn key_index(key: &str) -> u64 {
    let digest = sha256(key.as_bytes());
    u64::from_be_bytes(digest[0..8].try_into().expect("digest has 32 bytes"))
}
