//! # Domain Errors
//!
//! Every failure a registry operation can report. All of them are detected
//! before the first write, so a failed call never changes state.

use super::value_objects::{Entity, Role};
use shared_types::entities::{Address, CaseId, EvidenceId, StageId};
use thiserror::Error;

/// Custody registry error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    /// The caller lacks the role the operation requires.
    #[error("Unauthorized: {caller} does not hold the {required} role")]
    Unauthorized {
        /// Identity that made the call
        caller: Address,
        /// Role the operation requires
        required: Role,
    },

    /// A required identity was the zero address.
    #[error("Invalid identity: {field} must not be the zero address")]
    InvalidIdentity {
        /// Name of the offending argument
        field: &'static str,
    },

    /// An empty password hash was supplied.
    #[error("Password hash cannot be empty")]
    EmptyCredential,

    /// The referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(Entity),

    /// A record with this id already exists.
    #[error("Duplicate id: {0} already exists")]
    DuplicateId(Entity),

    /// An insert-only note write hit an existing note.
    #[error("Stage detail already exists: item {item}, stage {stage}")]
    AlreadySet {
        /// Evidence item id
        item: EvidenceId,
        /// Stage id
        stage: StageId,
    },

    /// Enable was requested for an active case.
    #[error("Case {0} is already enabled")]
    AlreadyActive(CaseId),

    /// Disable was requested for an inactive case.
    #[error("Case {0} is already disabled")]
    AlreadyInactive(CaseId),

    /// A range query with `start > end`.
    #[error("Invalid range: start {start} is greater than end {end}")]
    InvalidRange {
        /// Requested start index
        start: usize,
        /// Requested end index
        end: usize,
    },

    /// A range query whose start lies past the end of the collection.
    #[error("Start index out of bounds: {start} > {len}")]
    OutOfBounds {
        /// Requested start index
        start: usize,
        /// Collection length
        len: usize,
    },
}

impl CustodyError {
    /// Shorthand for an `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(caller: Address, required: Role) -> Self {
        Self::Unauthorized { caller, required }
    }

    /// True for failures caused by the caller's privileges.
    #[must_use]
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
