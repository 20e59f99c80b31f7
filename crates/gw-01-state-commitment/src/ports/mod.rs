//! # Ports
//!
//! Trait boundaries toward the collaborators this crate does not own: the
//! durable tree store, the authoritative on-chain root, and the denom trace
//! table.

pub mod outbound;

pub use outbound::{
    DenomTraceFinalizer, HostRootReader, MockDenomTraceFinalizer, MockHostRootReader, TreeRecord,
    TreeStore,
};
