//! # State Commitment Domain
//!
//! Pure, synchronous core: the tree, its proofs, the staging protocol, and
//! the snapshot codec. Nothing in this module performs I/O.

pub mod errors;
pub mod proof;
pub mod snapshot;
pub mod staging;
pub mod tree;

pub use errors::StateCommitmentError;
pub use proof::{compute_root_from_path, ExistenceProof, InnerOp, LeafSpec, NonExistenceProof};
pub use snapshot::TreeSnapshot;
pub use staging::{PendingTreeUpdate, PendingUpdateRegistry, StateUpdateKind, TreeUpdate};
pub use tree::{Ics23MerkleTree, TREE_DEPTH};
