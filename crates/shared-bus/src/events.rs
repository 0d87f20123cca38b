//! # Custody Events
//!
//! Defines every event that flows through the shared bus. These are the only
//! externally observable side-channel of the registries besides direct reads.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, CaseId, EvidenceId, StageId, Timestamp, UserId};

/// Which contract instance emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistryScope {
    /// The user accounts registry.
    Accounts,
    /// The case registry (factory).
    CaseRegistry,
    /// A single deployed case.
    Case(CaseId),
}

impl RegistryScope {
    /// The case id if this scope is a single case.
    #[must_use]
    pub fn case_id(&self) -> Option<CaseId> {
        match self {
            Self::Case(id) => Some(*id),
            _ => None,
        }
    }
}

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustodyEvent {
    // =========================================================================
    // ACCESS CONTROL (every contract instance)
    // =========================================================================
    /// The admin role moved to a new holder.
    AdminChanged {
        scope: RegistryScope,
        previous: Address,
        admin: Address,
        timestamp: Timestamp,
    },

    /// An identity joined or left the authorized set.
    AuthorizationChanged {
        scope: RegistryScope,
        address: Address,
        authorized: bool,
        timestamp: Timestamp,
    },

    // =========================================================================
    // ACCOUNTS
    // =========================================================================
    /// A user slot was assigned.
    UserAdded {
        user_id: UserId,
        address: Address,
        timestamp: Timestamp,
    },

    /// A user's credential or address was overwritten.
    UserUpdated {
        user_id: UserId,
        timestamp: Timestamp,
    },

    /// A user slot was soft-deleted.
    UserRemoved {
        user_id: UserId,
        timestamp: Timestamp,
    },

    /// A user's active flag was set.
    UserStateChanged {
        user_id: UserId,
        active: bool,
        timestamp: Timestamp,
    },

    /// A user login was recorded.
    UserLogin {
        user_id: UserId,
        timestamp: Timestamp,
    },

    // =========================================================================
    // CASE REGISTRY
    // =========================================================================
    /// A new case was deployed.
    CaseDeployed {
        case_id: CaseId,
        case_address: Address,
        owner: Address,
        timestamp: Timestamp,
    },

    /// A disabled case was re-enabled.
    CaseEnabled { case_id: CaseId, timestamp: Timestamp },

    /// An active case was disabled.
    CaseDisabled { case_id: CaseId, timestamp: Timestamp },

    /// An identity recorded an access to a case.
    CaseAccessed {
        case_id: CaseId,
        accessor: Address,
        timestamp: Timestamp,
    },

    // =========================================================================
    // CASE: STAGES & EVIDENCE
    // =========================================================================
    /// A stage was appended to a case's catalog.
    StageAdded {
        case_id: CaseId,
        stage_id: StageId,
        name: String,
        timestamp: Timestamp,
    },

    /// A stage was renamed.
    StageRenamed {
        case_id: CaseId,
        stage_id: StageId,
        name: String,
        timestamp: Timestamp,
    },

    /// An evidence item was registered in a case.
    EvidenceItemAdded {
        case_id: CaseId,
        item_id: EvidenceId,
        name: String,
        timestamp: Timestamp,
    },

    /// An evidence item was renamed.
    EvidenceItemRenamed {
        case_id: CaseId,
        item_id: EvidenceId,
        name: String,
        timestamp: Timestamp,
    },

    /// A stage note was written for an evidence item.
    StageDetailsUpdated {
        case_id: CaseId,
        item_id: EvidenceId,
        stage_id: StageId,
        timestamp: Timestamp,
    },
}

impl CustodyEvent {
    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::AdminChanged { .. } | Self::AuthorizationChanged { .. } => {
                EventTopic::AccessControl
            }
            Self::UserAdded { .. }
            | Self::UserUpdated { .. }
            | Self::UserRemoved { .. }
            | Self::UserStateChanged { .. }
            | Self::UserLogin { .. } => EventTopic::Accounts,
            Self::CaseDeployed { .. }
            | Self::CaseEnabled { .. }
            | Self::CaseDisabled { .. }
            | Self::CaseAccessed { .. } => EventTopic::CaseRegistry,
            Self::StageAdded { .. } | Self::StageRenamed { .. } => EventTopic::Stages,
            Self::EvidenceItemAdded { .. }
            | Self::EvidenceItemRenamed { .. }
            | Self::StageDetailsUpdated { .. } => EventTopic::Evidence,
        }
    }

    /// The case this event concerns, if any.
    #[must_use]
    pub fn case_id(&self) -> Option<CaseId> {
        match self {
            Self::AdminChanged { scope, .. } | Self::AuthorizationChanged { scope, .. } => {
                scope.case_id()
            }
            Self::CaseDeployed { case_id, .. }
            | Self::CaseEnabled { case_id, .. }
            | Self::CaseDisabled { case_id, .. }
            | Self::CaseAccessed { case_id, .. }
            | Self::StageAdded { case_id, .. }
            | Self::StageRenamed { case_id, .. }
            | Self::EvidenceItemAdded { case_id, .. }
            | Self::EvidenceItemRenamed { case_id, .. }
            | Self::StageDetailsUpdated { case_id, .. } => Some(*case_id),
            Self::UserAdded { .. }
            | Self::UserUpdated { .. }
            | Self::UserRemoved { .. }
            | Self::UserStateChanged { .. }
            | Self::UserLogin { .. } => None,
        }
    }

    /// When the emitting call was executed.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::AdminChanged { timestamp, .. }
            | Self::AuthorizationChanged { timestamp, .. }
            | Self::UserAdded { timestamp, .. }
            | Self::UserUpdated { timestamp, .. }
            | Self::UserRemoved { timestamp, .. }
            | Self::UserStateChanged { timestamp, .. }
            | Self::UserLogin { timestamp, .. }
            | Self::CaseDeployed { timestamp, .. }
            | Self::CaseEnabled { timestamp, .. }
            | Self::CaseDisabled { timestamp, .. }
            | Self::CaseAccessed { timestamp, .. }
            | Self::StageAdded { timestamp, .. }
            | Self::StageRenamed { timestamp, .. }
            | Self::EvidenceItemAdded { timestamp, .. }
            | Self::EvidenceItemRenamed { timestamp, .. }
            | Self::StageDetailsUpdated { timestamp, .. } => *timestamp,
        }
    }
}

/// Event topics for filtering subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Admin and authorized-set changes.
    AccessControl,
    /// User registry events.
    Accounts,
    /// Case lifecycle and access events.
    CaseRegistry,
    /// Stage catalog events.
    Stages,
    /// Evidence item and stage note events.
    Evidence,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Cases to include. Empty means events of any case, and events
    /// that belong to no case.
    pub case_ids: Vec<CaseId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            case_ids: Vec::new(),
        }
    }

    /// Create a filter for events that concern specific cases.
    #[must_use]
    pub fn for_cases(case_ids: Vec<CaseId>) -> Self {
        Self {
            topics: Vec::new(),
            case_ids,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &CustodyEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let case_match = self.case_ids.is_empty()
            || event
                .case_id()
                .is_some_and(|case_id| self.case_ids.contains(&case_id));

        topic_match && case_match
    }
}
