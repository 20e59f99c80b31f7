//! # Light Client Domain
//!
//! Tendermint-mirroring entities and the per-client state they hang off.

pub mod client;
pub mod errors;
pub mod header;
pub mod message;
pub mod validator;

pub use client::{
    ClientRecord, ClientState, ConsensusState, Status, TrustLevel, MAX_CONSENSUS_STATE_SIZE,
};
pub use errors::LightClientError;
pub use header::{BlockId, BlockIdFlag, Commit, CommitSig, PartSetHeader, SignedHeader, TmHeader};
pub use message::{ClientMessage, Header, Misbehaviour};
pub use validator::{Validator, ValidatorSet, MAX_TOTAL_VOTING_POWER};
