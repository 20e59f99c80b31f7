//! # Light Client Configuration

use crate::domain::MAX_CONSENSUS_STATE_SIZE;
use serde::{Deserialize, Serialize};

/// Configuration for the light client service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LightClientConfig {
    /// Consensus states retained per client; oldest entries are evicted
    /// beyond this bound.
    pub max_consensus_states: usize,
}

impl Default for LightClientConfig {
    fn default() -> Self {
        Self {
            max_consensus_states: MAX_CONSENSUS_STATE_SIZE,
        }
    }
}

impl LightClientConfig {
    /// Create a config for testing (smaller history bound).
    pub fn for_testing() -> Self {
        Self {
            max_consensus_states: 4,
        }
    }
}
