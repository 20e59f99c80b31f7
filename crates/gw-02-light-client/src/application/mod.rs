//! # Application Layer

pub mod client_service;

pub use client_service::LightClientService;
