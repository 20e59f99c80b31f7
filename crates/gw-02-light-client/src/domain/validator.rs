//! # Validators and Validator Sets

use crate::domain::errors::LightClientError;
use serde::{Deserialize, Serialize};

/// Upper bound on a set's total voting power, mirroring CometBFT's
/// `MaxTotalVotingPower` (i64 max / 8) so that tallies cannot overflow
/// during threshold arithmetic.
pub const MAX_TOTAL_VOTING_POWER: i64 = i64::MAX / 8;

/// One validator of the counterparty chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Address (20 bytes, first 20 of the pubkey hash).
    pub address: Vec<u8>,
    /// Ed25519 public key (32 bytes).
    pub pub_key: Vec<u8>,
    /// Voting power.
    pub voting_power: i64,
    /// Proposer priority accumulator.
    pub proposer_priority: i64,
}

/// A validator set with an optional proposer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSet {
    /// The validators, in canonical order.
    pub validators: Vec<Validator>,
    /// The round's proposer, when known.
    pub proposer: Option<Validator>,
}

impl ValidatorSet {
    /// Sum of all voting power, bounded by [`MAX_TOTAL_VOTING_POWER`].
    pub fn total_voting_power(&self) -> Result<i64, LightClientError> {
        let mut sum: i64 = 0;
        for validator in &self.validators {
            sum = sum
                .checked_add(validator.voting_power)
                .filter(|total| *total <= MAX_TOTAL_VOTING_POWER)
                .ok_or(LightClientError::TotalVotingPowerOverflow {
                    max: MAX_TOTAL_VOTING_POWER,
                })?;
        }
        Ok(sum)
    }

    /// Find a validator by address.
    pub fn by_address(&self, address: &[u8]) -> Option<&Validator> {
        self.validators
            .iter()
            .find(|v| v.address.as_slice() == address)
    }

    /// Number of validators in the set.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// True when the set holds no validators.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}
