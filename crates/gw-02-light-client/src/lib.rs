//! # GW-02 Tendermint Light Client
//!
//! Light-client verification for the Cardano IBC gateway.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Decide whether foreign-chain state updates are trustworthy before they
//! are folded into the state commitment tree:
//!
//! - structural (`ValidateBasic`-style) checks on headers, commits and
//!   validator sets
//! - header verification against a trusted consensus state, including the
//!   1/3 trust-level commit signature weight check
//! - byzantine misbehaviour detection (conflicting headers at one height,
//!   time-monotonicity violations) and client freezing
//! - bounded, height-ordered consensus state history per client
//!
//! ## Module Structure
//!
//! ```text
//! gw-02-light-client/
//! ├── domain/          # Headers, commits, validators, client/consensus state
//! ├── validation/      # Structural checks + commit signature weight
//! ├── ports.rs         # TendermintCodec (canonical wire encodings)
//! ├── application/     # LightClientService state transitions
//! └── config.rs        # LightClientConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod validation;

// Re-exports
pub use application::LightClientService;
pub use config::LightClientConfig;
pub use domain::{
    BlockId, BlockIdFlag, ClientMessage, ClientRecord, ClientState, Commit, CommitSig,
    ConsensusState, Header, LightClientError, Misbehaviour, PartSetHeader, SignedHeader, Status,
    TmHeader, TrustLevel, Validator, ValidatorSet, MAX_CONSENSUS_STATE_SIZE,
};
pub use ports::{MockTendermintCodec, TendermintCodec};
pub use validation::{
    validate_client_state, validate_commit, validate_consensus_state, validate_header,
    validate_signed_header, validate_validator, validate_validator_set,
    verify_commit_light, verify_commit_light_trusting,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
