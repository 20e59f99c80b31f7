//! # Tendermint Header and Commit Types
//!
//! Minimal mirrors of the CometBFT structures the light client consumes.
//! Wire decoding happens upstream; these carry the validated semantic
//! fields only, with heights and timestamps as native unsigned integers.

use serde::{Deserialize, Serialize};
use shared_types::TimestampNs;

/// Block identifier: header hash plus part-set header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockId {
    /// Hash of the block header.
    pub hash: Vec<u8>,
    /// Part-set header of the block.
    pub part_set_header: PartSetHeader,
}

impl BlockId {
    /// True when every component is zero-valued (the "nil block" id).
    pub fn is_zero(&self) -> bool {
        self.hash.iter().all(|b| *b == 0)
            && self.part_set_header.total == 0
            && self.part_set_header.hash.iter().all(|b| *b == 0)
    }
}

/// Part-set header inside a block id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSetHeader {
    /// Number of parts the block was split into.
    pub total: u32,
    /// Merkle root of the parts.
    pub hash: Vec<u8>,
}

/// How a validator's slot in a commit voted.
///
/// A closed enum: unknown flag values are rejected at the decode boundary
/// via [`BlockIdFlag::try_from`], so downstream code never sees them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockIdFlag {
    /// No vote received from the validator.
    Absent,
    /// Voted for the committed block.
    Commit,
    /// Voted for nil.
    Nil,
}

impl TryFrom<u8> for BlockIdFlag {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Absent),
            2 => Ok(Self::Commit),
            3 => Ok(Self::Nil),
            other => Err(other),
        }
    }
}

/// One validator's slot in a commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSig {
    /// How this slot voted.
    pub block_id_flag: BlockIdFlag,
    /// Address of the voting validator (20 bytes), empty for absent votes.
    pub validator_address: Vec<u8>,
    /// Vote timestamp (ns), zero for absent votes.
    pub timestamp: TimestampNs,
    /// Vote signature, empty for absent votes.
    pub signature: Vec<u8>,
}

impl CommitSig {
    /// An absent vote with all fields zero-valued.
    pub fn absent() -> Self {
        Self {
            block_id_flag: BlockIdFlag::Absent,
            validator_address: Vec::new(),
            timestamp: 0,
            signature: Vec::new(),
        }
    }

    /// True when address, timestamp and signature are all zero-valued.
    pub fn is_zeroed(&self) -> bool {
        self.validator_address.is_empty() && self.timestamp == 0 && self.signature.is_empty()
    }
}

/// Commit for a block: the votes that made it final.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Height the commit is for.
    pub height: u64,
    /// Consensus round that produced the commit.
    pub round: u32,
    /// Block the votes are for.
    pub block_id: BlockId,
    /// One slot per validator, in validator-set order.
    pub signatures: Vec<CommitSig>,
}

/// The header fields the light client needs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmHeader {
    /// Chain this header belongs to.
    pub chain_id: String,
    /// Block height.
    pub height: u64,
    /// Block time (ns since epoch).
    pub time: TimestampNs,
    /// Hash of the validator set that produced this block.
    pub validators_hash: Vec<u8>,
    /// Hash of the next block's validator set.
    pub next_validators_hash: Vec<u8>,
    /// Application state root after this block.
    pub app_hash: Vec<u8>,
}

/// Header plus the commit that finalized it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedHeader {
    /// The block header.
    pub header: TmHeader,
    /// The commit for that header.
    pub commit: Commit,
}
