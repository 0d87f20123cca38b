//! # Domain Module
//!
//! Core types and the single-threaded registries of the custody system.
//! Nothing here locks, logs or publishes; the application layer does.

pub mod access_control;
pub mod case_directory;
pub mod entities;
pub mod errors;
pub mod evidence_registry;
pub mod invariants;
pub mod stage_catalog;
pub mod user_registry;
pub mod value_objects;

pub use access_control::{AccessControl, CallContext};
pub use case_directory::CaseDirectory;
pub use entities::*;
pub use errors::*;
pub use evidence_registry::EvidenceRegistry;
pub use invariants::*;
pub use stage_catalog::StageCatalog;
pub use user_registry::UserRegistry;
pub use value_objects::*;
