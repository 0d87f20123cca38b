//! # Algorithms
//!
//! Pure functions shared by the registries: paginated reads and address
//! derivation.

pub mod case_address;
pub mod range_query;

pub use case_address::{compute_case_address, compute_registry_address, CASE_INIT_CODE};
pub use range_query::{resolve_window, select_range};
