//! # Structural Validation
//!
//! `ValidateBasic`-style checks: each rejects malformed structures with a
//! descriptive invalid-argument error before any stateful verification
//! runs. Heights, rounds and powers are unsigned or range-checked native
//! integers, so the negative-value checks of the wire format disappear by
//! construction.

use crate::domain::client::{ClientState, ConsensusState};
use crate::domain::errors::LightClientError;
use crate::domain::header::{BlockIdFlag, Commit, SignedHeader, TmHeader};
use crate::domain::validator::{Validator, ValidatorSet};

/// Maximum chain id length in bytes.
const MAX_CHAIN_ID_LEN: usize = 50;

/// Validator address length in bytes.
const ADDRESS_LEN: usize = 20;

/// Maximum signature length in bytes.
const MAX_SIGNATURE_LEN: usize = 64;

/// Validate a commit's structure.
pub fn validate_commit(commit: &Commit) -> Result<(), LightClientError> {
    if commit.height >= 1 {
        if commit.block_id.is_zero() {
            return Err(LightClientError::InvalidCommit(
                "commit cannot be for a nil block".to_string(),
            ));
        }
        if commit.signatures.is_empty() {
            return Err(LightClientError::InvalidCommit(
                "no signatures in commit".to_string(),
            ));
        }
    }

    for (index, sig) in commit.signatures.iter().enumerate() {
        match sig.block_id_flag {
            BlockIdFlag::Absent => {
                if !sig.is_zeroed() {
                    return Err(LightClientError::InvalidCommit(format!(
                        "commit sig {index}: absent vote must have zero-valued fields"
                    )));
                }
            }
            BlockIdFlag::Commit | BlockIdFlag::Nil => {
                if sig.validator_address.len() != ADDRESS_LEN {
                    return Err(LightClientError::InvalidCommit(format!(
                        "commit sig {index}: expected validator address of {ADDRESS_LEN} bytes, got {}",
                        sig.validator_address.len()
                    )));
                }
                if sig.signature.is_empty() {
                    return Err(LightClientError::InvalidCommit(format!(
                        "commit sig {index}: signature is missing"
                    )));
                }
                if sig.signature.len() > MAX_SIGNATURE_LEN {
                    return Err(LightClientError::InvalidCommit(format!(
                        "commit sig {index}: signature is too big (max: {MAX_SIGNATURE_LEN})"
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Validate a header's structure.
pub fn validate_header(header: &TmHeader) -> Result<(), LightClientError> {
    if header.chain_id.len() > MAX_CHAIN_ID_LEN {
        return Err(LightClientError::InvalidHeader(format!(
            "chain id is too long; got: {}, max: {MAX_CHAIN_ID_LEN}",
            header.chain_id.len()
        )));
    }
    if !header.next_validators_hash.is_empty() && header.next_validators_hash.len() != 32 {
        return Err(LightClientError::InvalidHeader(format!(
            "expected next validators hash of 32 bytes, got {}",
            header.next_validators_hash.len()
        )));
    }
    Ok(())
}

/// Validate a signed header against the chain id the client tracks.
pub fn validate_signed_header(
    signed_header: &SignedHeader,
    chain_id: &str,
) -> Result<(), LightClientError> {
    validate_header(&signed_header.header)?;
    validate_commit(&signed_header.commit)?;

    if signed_header.header.chain_id != chain_id {
        return Err(LightClientError::ChainIdMismatch {
            expected: chain_id.to_string(),
            got: signed_header.header.chain_id.clone(),
        });
    }
    if signed_header.commit.height != signed_header.header.height {
        return Err(LightClientError::InvalidHeader(format!(
            "commit height {} does not match header height {}",
            signed_header.commit.height, signed_header.header.height
        )));
    }
    Ok(())
}

/// Validate a single validator.
pub fn validate_validator(validator: &Validator) -> Result<(), LightClientError> {
    if validator.pub_key.len() != 32 {
        return Err(LightClientError::InvalidValidator(format!(
            "expected ed25519 public key of 32 bytes, got {}",
            validator.pub_key.len()
        )));
    }
    if validator.voting_power < 0 {
        return Err(LightClientError::InvalidValidator(format!(
            "validator has negative voting power {}",
            validator.voting_power
        )));
    }
    if validator.address.len() != ADDRESS_LEN {
        return Err(LightClientError::InvalidValidator(format!(
            "expected address of {ADDRESS_LEN} bytes, got {}",
            validator.address.len()
        )));
    }
    Ok(())
}

/// Validate a validator set: non-empty, every member valid, total power
/// within bounds.
pub fn validate_validator_set(set: &ValidatorSet) -> Result<(), LightClientError> {
    if set.is_empty() {
        return Err(LightClientError::InvalidValidator(
            "validator set is empty".to_string(),
        ));
    }
    for validator in &set.validators {
        validate_validator(validator)?;
    }
    if let Some(proposer) = &set.proposer {
        validate_validator(proposer)?;
    }
    set.total_voting_power().map(|_| ())
}

/// Validate a client state's parameters.
pub fn validate_client_state(client_state: &ClientState) -> Result<(), LightClientError> {
    if client_state.chain_id.is_empty() {
        return Err(LightClientError::InvalidClientState(
            "chain id cannot be empty string".to_string(),
        ));
    }
    if client_state.chain_id.len() > MAX_CHAIN_ID_LEN {
        return Err(LightClientError::InvalidClientState(format!(
            "chain id is too long; got: {}, max: {MAX_CHAIN_ID_LEN}",
            client_state.chain_id.len()
        )));
    }
    if !client_state.trust_level.is_within_valid_range() {
        return Err(LightClientError::InvalidClientState(
            "trust level must be within [1/3, 1]".to_string(),
        ));
    }
    if client_state.trusting_period == 0 {
        return Err(LightClientError::InvalidClientState(
            "trusting period must be greater than zero".to_string(),
        ));
    }
    if client_state.unbonding_period == 0 {
        return Err(LightClientError::InvalidClientState(
            "unbonding period must be greater than zero".to_string(),
        ));
    }
    if client_state.max_clock_drift == 0 {
        return Err(LightClientError::InvalidClientState(
            "max clock drift must be greater than zero".to_string(),
        ));
    }
    if client_state.latest_height.revision_height == 0 {
        return Err(LightClientError::InvalidClientState(
            "latest height revision height cannot be zero".to_string(),
        ));
    }
    if client_state.trusting_period >= client_state.unbonding_period {
        return Err(LightClientError::InvalidClientState(format!(
            "trusting period {} should be < unbonding period {}",
            client_state.trusting_period, client_state.unbonding_period
        )));
    }
    Ok(())
}

/// Validate a consensus state.
pub fn validate_consensus_state(state: &ConsensusState) -> Result<(), LightClientError> {
    if state.root.is_empty() {
        return Err(LightClientError::InvalidConsensusState(
            "root cannot be empty".to_string(),
        ));
    }
    if state.timestamp == 0 {
        return Err(LightClientError::InvalidConsensusState(
            "timestamp must be a positive Unix time".to_string(),
        ));
    }
    Ok(())
}
