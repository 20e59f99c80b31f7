//! # GW-01 State Commitment
//!
//! ICS-23 state commitment for the Cardano IBC gateway.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! The on-chain handler stores a single 32-byte root summarizing all IBC
//! state (clients, connections, channels, packets). This crate maintains the
//! off-chain mirror of that commitment:
//!
//! - a fixed-depth (64-level) Merkle tree keyed by `sha256(key)` that
//!   reproduces the on-chain root bit for bit
//! - ICS-23 existence / non-existence proofs over that tree
//! - a simulate-then-commit staging protocol so a failed transaction never
//!   corrupts canonical state
//! - gzip+JSON snapshot persistence with root verification on load
//!
//! ## Module Structure
//!
//! ```text
//! gw-01-state-commitment/
//! ├── domain/          # Ics23MerkleTree, proofs, staging, snapshot codec
//! ├── ports/           # Outbound traits: TreeStore, HostRootReader, DenomTraceFinalizer
//! ├── adapters/        # Memory and file-backed tree stores
//! ├── application/     # CommitmentService orchestrating stage/confirm/persist
//! └── config.rs        # CommitmentConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{FileTreeStore, MemoryTreeStore};
pub use application::CommitmentService;
pub use config::CommitmentConfig;
pub use domain::{
    ExistenceProof, Ics23MerkleTree, InnerOp, LeafSpec, NonExistenceProof, PendingTreeUpdate,
    PendingUpdateRegistry, StateCommitmentError, StateUpdateKind, TreeSnapshot, TreeUpdate,
    TREE_DEPTH,
};
pub use ports::{DenomTraceFinalizer, HostRootReader, TreeRecord, TreeStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
