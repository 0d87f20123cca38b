//! # Shared Types Crate
//!
//! Identity and identifier types used by every custody crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: ids, addresses and timestamps are defined
//!   once here and reused by the registry and the event bus.
//! - **Opaque Identity**: an `Address` carries no structure beyond equality;
//!   the zero value means "no identity".

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
