//! # Commit Signature Verification
//!
//! Voting-power tallies over ed25519 commit signatures. Two thresholds:
//!
//! - **trusting** (`verify_commit_light_trusting`): more than the client's
//!   trust level (default 1/3) of the *trusted* validator set must have
//!   signed the new commit. This is what lets a light client skip ahead
//!   across validator-set changes.
//! - **light** (`verify_commit_light`): more than 2/3 of the commit's own
//!   validator set must have signed, the bar a block needs to be final at
//!   all.
//!
//! The tally stops as soon as the threshold is crossed; a cryptographically
//! invalid signature anywhere before that point rejects the whole commit.

use crate::domain::errors::LightClientError;
use crate::domain::header::{BlockIdFlag, Commit};
use crate::domain::validator::ValidatorSet;
use crate::ports::TendermintCodec;
use ed25519_dalek::{Signature, VerifyingKey};
use std::collections::HashSet;

/// Require more than `trust_level` of `trusted_vals` to have signed.
pub fn verify_commit_light_trusting(
    codec: &dyn TendermintCodec,
    chain_id: &str,
    trusted_vals: &ValidatorSet,
    commit: &Commit,
    trust_level: crate::domain::client::TrustLevel,
) -> Result<(), LightClientError> {
    verify_commit_weight(
        codec,
        chain_id,
        trusted_vals,
        commit,
        trust_level.numerator,
        trust_level.denominator,
    )
}

/// Require more than 2/3 of `vals` to have signed.
pub fn verify_commit_light(
    codec: &dyn TendermintCodec,
    chain_id: &str,
    vals: &ValidatorSet,
    commit: &Commit,
) -> Result<(), LightClientError> {
    verify_commit_weight(codec, chain_id, vals, commit, 2, 3)
}

/// Tally the power of valid commit votes from `vals` and require
/// `tallied / total > numerator / denominator`.
fn verify_commit_weight(
    codec: &dyn TendermintCodec,
    chain_id: &str,
    vals: &ValidatorSet,
    commit: &Commit,
    numerator: u64,
    denominator: u64,
) -> Result<(), LightClientError> {
    let total = vals.total_voting_power()?;
    let mut tallied: i64 = 0;
    let mut seen: HashSet<&[u8]> = HashSet::with_capacity(commit.signatures.len());

    for (index, sig) in commit.signatures.iter().enumerate() {
        if sig.block_id_flag != BlockIdFlag::Commit {
            continue;
        }

        // Votes from validators outside the set are ignored, not errors:
        // for the trusting check the commit legitimately contains new
        // validators the trusted set has never heard of.
        let Some(validator) = vals.by_address(&sig.validator_address) else {
            continue;
        };

        if !seen.insert(sig.validator_address.as_slice()) {
            return Err(LightClientError::DuplicateVote { index });
        }

        let key_bytes: &[u8; 32] = validator
            .pub_key
            .as_slice()
            .try_into()
            .map_err(|_| LightClientError::InvalidValidator(format!(
                "validator at commit index {index} has malformed public key"
            )))?;
        let verifying_key = VerifyingKey::from_bytes(key_bytes).map_err(|_| {
            LightClientError::InvalidValidator(format!(
                "validator at commit index {index} has invalid ed25519 public key"
            ))
        })?;
        let signature = Signature::from_slice(&sig.signature)
            .map_err(|_| LightClientError::InvalidSignature { index })?;

        let sign_bytes = codec.vote_sign_bytes(chain_id, commit, index);
        verifying_key
            .verify_strict(&sign_bytes, &signature)
            .map_err(|_| LightClientError::InvalidSignature { index })?;

        tallied = tallied
            .checked_add(validator.voting_power)
            .ok_or(LightClientError::TotalVotingPowerOverflow {
                max: crate::domain::validator::MAX_TOTAL_VOTING_POWER,
            })?;

        // Strict majority over the fraction: tallied/total > num/den.
        if (tallied as i128) * (denominator as i128) > (total as i128) * (numerator as i128) {
            return Ok(());
        }
    }

    Err(LightClientError::InsufficientVotingPower { tallied, total })
}
