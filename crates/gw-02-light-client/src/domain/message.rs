//! # Client Messages
//!
//! The two update paths a relayer can submit for a client: a new header, or
//! explicit misbehaviour evidence. A closed sum type, so every handler is
//! forced to treat both cases.

use crate::domain::client::ConsensusState;
use crate::domain::header::SignedHeader;
use crate::domain::validator::ValidatorSet;
use serde::{Deserialize, Serialize};
use shared_types::Height;

/// An IBC Tendermint header submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The new signed header.
    pub signed_header: SignedHeader,
    /// Validator set that produced the new header.
    pub validator_set: ValidatorSet,
    /// Stored height the submitter claims to trust.
    pub trusted_height: Height,
    /// Next-validators of the trusted height, as claimed by the submitter.
    pub trusted_validators: ValidatorSet,
}

impl Header {
    /// Height this header would be stored at, in the trusted revision.
    pub fn height(&self) -> Height {
        Height::new(
            self.trusted_height.revision_number,
            self.signed_header.header.height,
        )
    }

    /// The consensus state this header implies.
    pub fn consensus_state(&self) -> ConsensusState {
        ConsensusState {
            timestamp: self.signed_header.header.time,
            next_validators_hash: self.signed_header.header.next_validators_hash.clone(),
            root: self.signed_header.header.app_hash.clone(),
        }
    }
}

/// Evidence of two conflicting headers for one client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misbehaviour {
    /// Client the evidence targets.
    pub client_id: String,
    /// First conflicting header.
    pub header1: Header,
    /// Second conflicting header.
    pub header2: Header,
}

/// A parsed client message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// A header update.
    Header(Box<Header>),
    /// Explicit misbehaviour evidence.
    Misbehaviour(Box<Misbehaviour>),
}
