//! # Light Client Errors
//!
//! Callers distinguish two families: invalid-argument errors are expected
//! operational traffic (relayers submit stale or malformed messages all the
//! time) and mean "reject this update"; internal errors mean the gateway
//! itself is inconsistent and the workflow should halt.

use shared_types::{Height, TimestampNs};
use thiserror::Error;

/// Light client error types.
#[derive(Debug, Error)]
pub enum LightClientError {
    /// A commit failed structural validation.
    #[error("invalid commit: {0}")]
    InvalidCommit(String),

    /// A header failed structural validation.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A validator or validator set failed structural validation.
    #[error("invalid validator: {0}")]
    InvalidValidator(String),

    /// A client state failed structural validation.
    #[error("invalid client state: {0}")]
    InvalidClientState(String),

    /// A consensus state failed structural validation.
    #[error("invalid consensus state: {0}")]
    InvalidConsensusState(String),

    /// A signed header declared a different chain than expected.
    #[error("chain id mismatch: expected {expected}, got {got}")]
    ChainIdMismatch {
        /// Chain id the client tracks.
        expected: String,
        /// Chain id the header declared.
        got: String,
    },

    /// No trusted consensus state stored at a header's claimed trusted
    /// height. Indicates a malicious or malformed header.
    #[error("could not get trusted consensus state at height {height}")]
    TrustedConsensusStateNotFound {
        /// The claimed trusted height.
        height: Height,
    },

    /// A consensus state already exists at the update's height.
    ///
    /// Re-submitting an already-accepted header is an error, not a silent
    /// no-op.
    #[error("consensus state already exists at height {height}")]
    ConsensusStateExists {
        /// The duplicated height.
        height: Height,
    },

    /// The client is frozen; no further updates are accepted.
    #[error("client is frozen due to misbehaviour")]
    ClientFrozen,

    /// Header height is not newer than its trusted height.
    #[error("header height {header} must be greater than trusted height {trusted}")]
    HeaderHeightNotNewer {
        /// Height the header carries.
        header: u64,
        /// Height it claims to trust.
        trusted: u64,
    },

    /// Header time is not after the trusted header time.
    #[error("header time {header_time} must be after trusted time {trusted_time}")]
    NonMonotonicHeaderTime {
        /// New header timestamp (ns).
        header_time: TimestampNs,
        /// Trusted header timestamp (ns).
        trusted_time: TimestampNs,
    },

    /// Header time is further in the future than the allowed clock drift.
    #[error("header time {header_time} is from the future (max allowed {max_allowed})")]
    HeaderFromFuture {
        /// New header timestamp (ns).
        header_time: TimestampNs,
        /// Latest acceptable timestamp (ns).
        max_allowed: TimestampNs,
    },

    /// The trusted consensus state aged past the trusting period.
    #[error("trusted consensus state expired at {expired_at} (now: {now})")]
    TrustedStateExpired {
        /// Instant the trusting period ran out (ns).
        expired_at: TimestampNs,
        /// Reference time of the check (ns).
        now: TimestampNs,
    },

    /// The adjacent update's validator set does not match the trusted
    /// next-validators hash.
    #[error("validators hash does not match trusted next validators hash")]
    NextValidatorsMismatch,

    /// Commit signatures did not reach the required voting-power threshold.
    #[error("insufficient voting power: tallied {tallied} of {total}")]
    InsufficientVotingPower {
        /// Power of valid commit signatures.
        tallied: i64,
        /// Total power of the validator set.
        total: i64,
    },

    /// A commit signature failed cryptographic verification.
    #[error("invalid commit signature at index {index}")]
    InvalidSignature {
        /// Index into the commit's signature list.
        index: usize,
    },

    /// A validator appears more than once in a commit.
    #[error("duplicate vote from validator at index {index}")]
    DuplicateVote {
        /// Index of the second vote.
        index: usize,
    },

    /// Validator power sum exceeded the protocol maximum.
    #[error("total voting power exceeds maximum {max}")]
    TotalVotingPowerOverflow {
        /// The protocol maximum.
        max: i64,
    },

    /// The gateway itself is in an inconsistent state.
    #[error("internal light client error: {0}")]
    Internal(String),
}

impl LightClientError {
    /// True for failures meaning the system is inconsistent, as opposed to a
    /// rejectable message.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}
