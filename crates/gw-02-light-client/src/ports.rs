//! # Ports
//!
//! The light client's one external dependency: canonical CometBFT wire
//! encodings. Vote sign-bytes and validator-set hashing are protobuf-level
//! concerns owned by the message decoding layer; the verification logic
//! here only needs the resulting bytes.

use crate::domain::header::Commit;
use crate::domain::validator::ValidatorSet;

/// Canonical wire encodings - outbound port.
///
/// Implementations must produce the exact bytes the counterparty chain
/// signs and hashes, or signature and hash checks will reject honest
/// headers.
pub trait TendermintCodec: Send + Sync {
    /// Canonical sign-bytes for the vote at `signature_index` of `commit`.
    fn vote_sign_bytes(&self, chain_id: &str, commit: &Commit, signature_index: usize) -> Vec<u8>;

    /// Canonical hash of a validator set.
    fn validator_set_hash(&self, validator_set: &ValidatorSet) -> Vec<u8>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Deterministic stand-in codec for tests.
///
/// Not wire-compatible with CometBFT; it exists so test fixtures can sign
/// and hash consistently on both the "chain" side and the verifier side.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockTendermintCodec;

impl TendermintCodec for MockTendermintCodec {
    fn vote_sign_bytes(&self, chain_id: &str, commit: &Commit, signature_index: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(chain_id.as_bytes());
        bytes.extend_from_slice(&commit.height.to_be_bytes());
        bytes.extend_from_slice(&commit.round.to_be_bytes());
        bytes.extend_from_slice(&commit.block_id.hash);
        if let Some(sig) = commit.signatures.get(signature_index) {
            bytes.extend_from_slice(&sig.validator_address);
            bytes.extend_from_slice(&sig.timestamp.to_be_bytes());
        }
        bytes
    }

    fn validator_set_hash(&self, validator_set: &ValidatorSet) -> Vec<u8> {
        let mut bytes = Vec::new();
        for validator in &validator_set.validators {
            bytes.extend_from_slice(&validator.pub_key);
            bytes.extend_from_slice(&validator.voting_power.to_be_bytes());
        }
        shared_crypto::sha256(&bytes).to_vec()
    }
}
