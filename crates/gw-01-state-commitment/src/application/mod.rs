//! # Application Layer

pub mod commitment_service;

pub use commitment_service::CommitmentService;
