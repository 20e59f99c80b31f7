//! # Client and Consensus State
//!
//! Per-client light-client state: the tracked chain's parameters plus a
//! bounded, height-ordered history of consensus states.

use serde::{Deserialize, Serialize};
use shared_types::{Height, TimestampNs};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Consensus states retained per client before oldest-first eviction.
pub const MAX_CONSENSUS_STATE_SIZE: usize = 100;

/// Trust fraction for non-adjacent updates, `numerator/denominator`.
///
/// Valid range is `[1/3, 1]`; anything below 1/3 breaks the light-client
/// security model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustLevel {
    /// Fraction numerator.
    pub numerator: u64,
    /// Fraction denominator.
    pub denominator: u64,
}

impl TrustLevel {
    /// The canonical 1/3 trust level.
    pub const ONE_THIRD: TrustLevel = TrustLevel {
        numerator: 1,
        denominator: 3,
    };

    /// True when the fraction sits inside `[1/3, 1]`.
    pub fn is_within_valid_range(&self) -> bool {
        if self.denominator == 0 {
            return false;
        }
        self.numerator * 3 >= self.denominator && self.numerator <= self.denominator
    }
}

/// Tracked-chain parameters for one light client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// Chain id of the tracked chain.
    pub chain_id: String,
    /// Trust fraction for non-adjacent header verification.
    pub trust_level: TrustLevel,
    /// How long a consensus state remains trustworthy (ns).
    pub trusting_period: u64,
    /// Staking unbonding period of the tracked chain (ns).
    pub unbonding_period: u64,
    /// How far a new header's time may sit in the future (ns).
    pub max_clock_drift: u64,
    /// Non-zero once the client froze on proven misbehaviour. The value is
    /// purely a boolean flag; `{0, 1}` by convention.
    pub frozen_height: Height,
    /// Highest height the client has been updated to.
    pub latest_height: Height,
}

impl ClientState {
    /// True once misbehaviour froze the client. Frozen is terminal.
    pub fn is_frozen(&self) -> bool {
        !self.frozen_height.is_zero()
    }

    /// True when a consensus state with `latest_timestamp` has outlived the
    /// trusting period at `now`.
    pub fn is_expired(&self, latest_timestamp: TimestampNs, now: TimestampNs) -> bool {
        latest_timestamp.saturating_add(self.trusting_period) < now
    }
}

/// The per-height snapshot the client keeps of the tracked chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    /// Header time (ns).
    pub timestamp: TimestampNs,
    /// Hash of the next validator set.
    pub next_validators_hash: Vec<u8>,
    /// Commitment root (the app hash).
    pub root: Vec<u8>,
}

/// Operational status of a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Accepting updates.
    Active,
    /// Frozen on proven misbehaviour; terminal.
    Frozen,
    /// Latest consensus state aged past the trusting period.
    Expired,
}

/// One client's full stored state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Tracked-chain parameters.
    pub client_state: ClientState,
    /// Height-ordered consensus state history.
    pub consensus_states: BTreeMap<Height, ConsensusState>,
}

impl ClientRecord {
    /// Create a record from an initial client and consensus state.
    pub fn new(client_state: ClientState, consensus_state: ConsensusState) -> Self {
        let mut consensus_states = BTreeMap::new();
        consensus_states.insert(client_state.latest_height, consensus_state);
        Self {
            client_state,
            consensus_states,
        }
    }

    /// Consensus state stored at an exact height.
    pub fn consensus_state_at(&self, height: &Height) -> Option<&ConsensusState> {
        self.consensus_states.get(height)
    }

    /// Stored consensus state with the greatest height below `height`.
    pub fn prev_consensus_state(&self, height: &Height) -> Option<&ConsensusState> {
        self.consensus_states
            .range(..*height)
            .next_back()
            .map(|(_, state)| state)
    }

    /// Stored consensus state with the smallest height above `height`.
    pub fn next_consensus_state(&self, height: &Height) -> Option<&ConsensusState> {
        self.consensus_states
            .range((Bound::Excluded(*height), Bound::Unbounded))
            .next()
            .map(|(_, state)| state)
    }

    /// Consensus state at the client's latest height.
    pub fn latest_consensus_state(&self) -> Option<&ConsensusState> {
        self.consensus_states.get(&self.client_state.latest_height)
    }

    /// Operational status at `now`.
    pub fn status(&self, now: TimestampNs) -> Status {
        if self.client_state.is_frozen() {
            return Status::Frozen;
        }
        match self.latest_consensus_state() {
            Some(state) if self.client_state.is_expired(state.timestamp, now) => Status::Expired,
            Some(_) => Status::Active,
            // No consensus state at the latest height means the client has
            // nothing left to trust.
            None => Status::Expired,
        }
    }
}
