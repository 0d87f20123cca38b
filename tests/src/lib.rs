//! # Custody-Chain Test Suite
//!
//! Unified test crate for flows that cross registry boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # End-to-end registry flows
//!     ├── fixtures.rs       # Shared wiring and identities
//!     ├── accounts_flow.rs  # User lifecycle
//!     ├── case_flow.rs      # Deploy, evidence, stage notes
//!     └── event_flow.rs     # Bus subscriptions
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p custody-tests
//!
//! # By flow
//! cargo test -p custody-tests integration::case_flow::
//! ```

#![allow(dead_code)]

pub mod integration;
