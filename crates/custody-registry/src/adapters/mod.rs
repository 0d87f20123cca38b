//! # Adapters Layer
//!
//! Implementations of outbound ports beyond the production defaults.

mod fixed_clock;

pub use fixed_clock::FixedTimeSource;
