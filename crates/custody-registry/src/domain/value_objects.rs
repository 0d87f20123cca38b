//! # Value Objects
//!
//! Small immutable types used to describe requests and failures.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, CaseId, EvidenceId, StageId, UserId};
use std::fmt;

/// Privilege a caller must hold for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The single admin of a contract instance.
    Admin,
    /// The admin or any member of the authorized set.
    Authorized,
    /// The user the record belongs to, or the admin.
    AccountHolder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Authorized => write!(f, "authorized"),
            Self::AccountHolder => write!(f, "account holder"),
        }
    }
}

/// A record kind plus the key that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    /// A user slot.
    User(UserId),
    /// A stage in a case's catalog.
    Stage(StageId),
    /// An evidence item.
    EvidenceItem(EvidenceId),
    /// The note of one stage of one evidence item.
    StageNote {
        /// Evidence item id.
        item: EvidenceId,
        /// Stage id.
        stage: StageId,
    },
    /// A deployed case.
    Case(CaseId),
    /// The access record of one identity for one case.
    AccessRecord {
        /// Case id.
        case_id: CaseId,
        /// Identity that accessed the case.
        accessor: Address,
    },
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user {id}"),
            Self::Stage(id) => write!(f, "stage {id}"),
            Self::EvidenceItem(id) => write!(f, "evidence item {id}"),
            Self::StageNote { item, stage } => write!(f, "stage {stage} note of item {item}"),
            Self::Case(id) => write!(f, "case {id}"),
            Self::AccessRecord { case_id, accessor } => {
                write!(f, "access record of {accessor} for case {case_id}")
            }
        }
    }
}

/// How a stage note write treats an existing note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteMode {
    /// Fail with `AlreadySet` when the stage already has a note.
    #[default]
    InsertOnly,
    /// Create the note or replace the existing one.
    Upsert,
}

/// What a successful stage note write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteOutcome {
    /// No note existed; the stage count grew by one.
    Created,
    /// An existing note was overwritten.
    Replaced,
}

/// Lifecycle of a user id slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    /// The id was never assigned.
    Absent,
    /// The id holds a live user.
    Registered,
    /// The user was soft-deleted; the id stays taken.
    Removed,
}
