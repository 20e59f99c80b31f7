//! # IBC Height
//!
//! Revision-aware block height used to key consensus states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// IBC height: a revision number (chain restart counter) plus a block height
/// within that revision.
///
/// Ordering is lexicographic on `(revision_number, revision_height)`, so a
/// `BTreeMap<Height, _>` iterates consensus states oldest-first and lookups
/// compare by value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Height {
    /// Revision (chain id suffix) this height belongs to.
    pub revision_number: u64,
    /// Block height within the revision.
    pub revision_height: u64,
}

impl Height {
    /// Create a height.
    pub fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// The zero height.
    pub fn zero() -> Self {
        Self::default()
    }

    /// True when both components are zero.
    ///
    /// A non-zero frozen height on a client state means "frozen"; the actual
    /// value carries no further meaning.
    pub fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}
