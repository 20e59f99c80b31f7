//! # Shared Crypto Crate
//!
//! SHA-256 hash primitives with the domain separation used by the on-chain
//! IBC state commitment scheme. Every hash the gateway computes for the
//! commitment tree goes through this crate, so the off-chain root matches
//! the on-chain validator byte for byte.

pub mod hashing;

pub use hashing::*;
