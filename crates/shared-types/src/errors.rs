//! # Shared Type Errors
//!
//! Conversion errors for the scalar types.

use thiserror::Error;

/// Errors produced by scalar conversions.
#[derive(Debug, Error)]
pub enum SharedTypeError {
    /// Input was not valid hex.
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Decoded byte length was not 32.
    #[error("invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength {
        /// Number of bytes actually decoded.
        got: usize,
    },
}
