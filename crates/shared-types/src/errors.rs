//! # Error Types
//!
//! Errors raised while decoding shared primitives.

use thiserror::Error;

/// Errors from parsing an `Address` out of its hex form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    /// Wrong number of hex digits.
    #[error("Invalid address length: expected {expected} hex digits, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// Input contained non-hex characters.
    #[error("Invalid address hex: {0}")]
    InvalidHex(String),
}
