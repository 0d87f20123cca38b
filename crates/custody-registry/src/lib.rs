//! # Custody Registry
//!
//! Chain-of-custody bookkeeping for digital evidence.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Track investigative cases, the evidence items inside them, and one
//! free-text note per evidence item per investigative stage:
//! - A case registry deploys cases under admin-chosen ids and keeps their
//!   enabled flag and access log
//! - Each case owns its access control, stage catalog and evidence registry
//! - A separate accounts registry keeps user credentials
//!
//! ## Access Control
//!
//! | Operation | Required role |
//! |-----------|---------------|
//! | Manage authorized set, rename stages, enable/disable cases | Admin |
//! | Deploy cases, add evidence, record stage notes | Authorized (or admin) |
//! | Log in as a user | That user, or admin |
//! | Record a case access, all reads | Anyone |
//!
//! Every mutation takes the caller explicitly; domain registries receive it
//! through a [`CallContext`] together with the governing [`AccessControl`].
//!
//! ## Module Structure
//!
//! ```text
//! custody-registry/
//! ├── domain/          # Registries, records, errors, invariants
//! ├── algorithms/      # Range queries, address derivation
//! ├── ports/           # API traits + clock/event bus traits
//! ├── adapters/        # Fixed clock
//! └── application/     # Lock-guarded services: accounts, case, case registry
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::FixedTimeSource;
pub use algorithms::{compute_case_address, compute_registry_address, resolve_window, select_range};
pub use application::{AccountsService, Case, CaseRegistryService};
pub use config::{RegistryConfig, DEFAULT_CASE_STAGES};
pub use domain::{
    AccessControl, AccessRecord, CallContext, CaseDirectory, CasePage, CaseRecord, CustodyError,
    Entity, EvidenceItem, EvidenceItemDetails, EvidenceItemPage, EvidenceRegistry, NoteMode,
    NoteOutcome, Role, Stage, StageCatalog, StageDetails, StageNote, User, UserRegistry, UserSlot,
    UserStatus,
};
pub use ports::{
    AccessControlApi, AccountsApi, CaseApi, CaseRegistryApi, EventPublisher, SystemTimeSource,
    TimeSource,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
