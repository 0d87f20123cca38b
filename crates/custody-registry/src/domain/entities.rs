//! # Domain Entities
//!
//! Records held by the registries and the read models built from them.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, CaseId, EvidenceId, StageId, Timestamp, UserId};
use std::collections::BTreeMap;

// =============================================================================
// USERS
// =============================================================================

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Registry-assigned id (0-based).
    pub id: UserId,
    /// Identity the user logs in with.
    pub address: Address,
    /// Opaque credential hash. Never empty for a live user.
    pub password_hash: String,
    /// Active flag, set by the admin.
    pub active: bool,
}

impl User {
    /// The record a removed slot reads back as.
    #[must_use]
    pub fn removed(id: UserId) -> Self {
        Self {
            id,
            address: Address::ZERO,
            password_hash: String::new(),
            active: false,
        }
    }
}

/// One id slot of the user registry.
///
/// Slots are never reused: a removed user keeps its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserSlot {
    /// A live user.
    Registered(User),
    /// A soft-deleted user.
    Removed,
}

impl UserSlot {
    /// The live user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Registered(user) => Some(user),
            Self::Removed => None,
        }
    }
}

// =============================================================================
// STAGES
// =============================================================================

/// A named investigative stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Position in the catalog.
    pub id: StageId,
    /// Display name.
    pub name: String,
}

/// Free-text note recorded for one stage of an evidence item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageNote {
    /// Note text.
    pub text: String,
    /// Time of the latest write.
    pub updated_at: Timestamp,
}

/// A stage as seen from one evidence item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDetails {
    /// Stage id.
    pub stage_id: StageId,
    /// Stage name from the catalog.
    pub stage_name: String,
    /// Note text, if one was recorded.
    pub note: Option<String>,
    /// Time of the latest note write, if one was recorded.
    pub updated_at: Option<Timestamp>,
}

// =============================================================================
// EVIDENCE
// =============================================================================

/// An evidence item and its stage notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Caller-chosen unique id.
    pub id: EvidenceId,
    /// Display name.
    pub name: String,
    /// Registration time. Never changes.
    pub added_at: Timestamp,
    /// Recorded notes keyed by stage id.
    pub notes: BTreeMap<StageId, StageNote>,
}

impl EvidenceItem {
    /// Create an item with no notes.
    #[must_use]
    pub fn new(id: EvidenceId, name: impl Into<String>, added_at: Timestamp) -> Self {
        Self {
            id,
            name: name.into(),
            added_at,
            notes: BTreeMap::new(),
        }
    }

    /// Number of stages that have a note.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.notes.len()
    }

    /// The note recorded for a stage.
    #[must_use]
    pub fn note(&self, stage: StageId) -> Option<&StageNote> {
        self.notes.get(&stage)
    }
}

/// Full view of an evidence item against its case's stage catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItemDetails {
    /// Item id.
    pub id: EvidenceId,
    /// Item name.
    pub name: String,
    /// Registration time.
    pub added_at: Timestamp,
    /// Number of recorded notes.
    pub stage_count: usize,
    /// One entry per catalog stage, in catalog order.
    pub stages: Vec<StageDetails>,
}

/// A page of evidence items as parallel columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItemPage {
    /// Item ids.
    pub ids: Vec<EvidenceId>,
    /// Item names.
    pub names: Vec<String>,
    /// Registration times.
    pub added_at: Vec<Timestamp>,
    /// Recorded note counts.
    pub stage_counts: Vec<usize>,
}

impl EvidenceItemPage {
    /// Number of rows in the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the page has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<'a> FromIterator<&'a EvidenceItem> for EvidenceItemPage {
    fn from_iter<I: IntoIterator<Item = &'a EvidenceItem>>(iter: I) -> Self {
        let mut page = Self::default();
        for item in iter {
            page.ids.push(item.id);
            page.names.push(item.name.clone());
            page.added_at.push(item.added_at);
            page.stage_counts.push(item.stage_count());
        }
        page
    }
}

// =============================================================================
// CASES
// =============================================================================

/// Registry bookkeeping for one deployed case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Admin-chosen unique id.
    pub case_id: CaseId,
    /// Derived reference to the case instance.
    pub case_address: Address,
    /// Admin of the case.
    pub owner: Address,
    /// Deployment time.
    pub deployed_at: Timestamp,
    /// Enabled flag. True on creation.
    pub active: bool,
}

/// A page of case records as parallel columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasePage {
    /// Case ids.
    pub case_ids: Vec<CaseId>,
    /// Case addresses.
    pub case_addresses: Vec<Address>,
    /// Deployment times.
    pub deployed_at: Vec<Timestamp>,
    /// Enabled flags.
    pub active: Vec<bool>,
}

impl CasePage {
    /// Number of rows in the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.case_ids.len()
    }

    /// True when the page has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.case_ids.is_empty()
    }
}

impl<'a> FromIterator<&'a CaseRecord> for CasePage {
    fn from_iter<I: IntoIterator<Item = &'a CaseRecord>>(iter: I) -> Self {
        let mut page = Self::default();
        for record in iter {
            page.case_ids.push(record.case_id);
            page.case_addresses.push(record.case_address);
            page.deployed_at.push(record.deployed_at);
            page.active.push(record.active);
        }
        page
    }
}

/// Latest access of one identity to one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    /// Case id.
    pub case_id: CaseId,
    /// Identity that accessed the case.
    pub accessor: Address,
    /// Time of the latest access.
    pub accessed_at: Timestamp,
}
