//! # Primitive Scalars
//!
//! 32-byte hashes, nanosecond timestamps, and hex conversion helpers.

use crate::errors::SharedTypeError;

/// 32-byte SHA-256 output.
pub type Hash32 = [u8; 32];

/// The all-zero hash, used as the empty-subtree sentinel throughout the
/// commitment scheme. The root of an empty tree is exactly this value.
pub const EMPTY_HASH: Hash32 = [0u8; 32];

/// Unix timestamp in nanoseconds.
///
/// Tendermint headers carry nanosecond-precision times; keeping the raw
/// nanosecond count avoids precision loss when comparing against trusting
/// periods, which are also nanosecond durations.
pub type TimestampNs = u64;

/// Encode a hash as 64 lowercase hex characters.
pub fn hash_to_hex(hash: &Hash32) -> String {
    hex::encode(hash)
}

/// Decode a 64-character hex string into a hash.
pub fn hash_from_hex(s: &str) -> Result<Hash32, SharedTypeError> {
    let bytes = hex::decode(s).map_err(|_| SharedTypeError::InvalidHex(s.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| SharedTypeError::InvalidHashLength { got: bytes.len() })
}
