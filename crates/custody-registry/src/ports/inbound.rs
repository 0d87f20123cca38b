//! # Inbound Ports
//!
//! API traits for the three kinds of contract instance: the accounts
//! registry, a deployed case, and the case registry that deploys cases.
//!
//! Every mutating call names its caller explicitly. Calls are synchronous:
//! each runs to completion under the instance's own lock.

use crate::domain::{
    AccessRecord, CasePage, CaseRecord, CustodyError, EvidenceItem, EvidenceItemDetails,
    EvidenceItemPage, NoteMode, NoteOutcome, StageDetails, User, UserStatus,
};
use shared_types::entities::{Address, CaseId, EvidenceId, StageId, Timestamp, UserId};
use std::sync::Arc;

/// Admin role and authorized set of a contract instance.
pub trait AccessControlApi: Send + Sync {
    /// Current admin.
    fn admin(&self) -> Address;

    /// True if `id` is the admin or authorized.
    fn is_authorized(&self, id: &Address) -> bool;

    /// Members of the authorized set.
    fn authorized_users(&self) -> Vec<Address>;

    /// Hand the admin role to `new_admin`. Admin only.
    fn set_admin(&self, caller: Address, new_admin: Address) -> Result<(), CustodyError>;

    /// Add an identity to the authorized set. Admin only, idempotent.
    fn add_authorized_user(&self, caller: Address, id: Address) -> Result<(), CustodyError>;

    /// Remove an identity from the authorized set. Admin only, idempotent.
    fn remove_authorized_user(&self, caller: Address, id: Address) -> Result<(), CustodyError>;
}

/// Accounts registry API - inbound port.
pub trait AccountsApi: Send + Sync {
    /// Current admin of the registry.
    fn admin(&self) -> Address;

    /// Hand the admin role to `new_admin`.
    fn set_admin(&self, caller: Address, new_admin: Address) -> Result<(), CustodyError>;

    /// Register a user; returns its id.
    fn add_user(
        &self,
        caller: Address,
        address: Address,
        password_hash: &str,
    ) -> Result<UserId, CustodyError>;

    /// Read a user. Removed users read back zeroed.
    fn get_user(&self, id: UserId) -> Result<User, CustodyError>;

    /// Lifecycle of an id slot.
    fn user_status(&self, id: UserId) -> UserStatus;

    /// Overwrite a user's credential and optionally its address.
    fn update_user(
        &self,
        caller: Address,
        id: UserId,
        new_address: Option<Address>,
        new_hash: &str,
    ) -> Result<(), CustodyError>;

    /// Soft-delete a user.
    fn remove_user(&self, caller: Address, id: UserId) -> Result<(), CustodyError>;

    /// Set a user's active flag.
    fn set_user_state(&self, caller: Address, id: UserId, active: bool)
        -> Result<(), CustodyError>;

    /// Record a login by the user or the admin.
    fn login(&self, caller: Address, id: UserId) -> Result<Timestamp, CustodyError>;

    /// Addresses of live users in id order.
    fn all_users(&self) -> Vec<Address>;

    /// Number of assigned id slots.
    fn user_count(&self) -> usize;
}

/// Case API - inbound port.
pub trait CaseApi: AccessControlApi {
    /// Id the case was deployed under.
    fn case_id(&self) -> CaseId;

    // --- stages ---

    /// Append a stage. Admin only.
    fn add_new_stage(&self, caller: Address, name: &str) -> Result<StageId, CustodyError>;

    /// Rename a stage. Admin only.
    fn update_stage_name(
        &self,
        caller: Address,
        id: StageId,
        name: &str,
    ) -> Result<(), CustodyError>;

    /// Name of a stage.
    fn stage_name(&self, id: StageId) -> Result<String, CustodyError>;

    /// All stage names in catalog order.
    fn stage_names(&self) -> Vec<String>;

    // --- evidence ---

    /// Register an evidence item. Authorized only.
    fn add_evidence_item(
        &self,
        caller: Address,
        id: EvidenceId,
        name: &str,
    ) -> Result<(), CustodyError>;

    /// Write a stage note. Authorized only.
    fn record_stage_details(
        &self,
        caller: Address,
        item: EvidenceId,
        stage: StageId,
        text: &str,
        mode: NoteMode,
    ) -> Result<NoteOutcome, CustodyError>;

    /// Write a stage note that must not exist yet.
    fn add_stage_details(
        &self,
        caller: Address,
        item: EvidenceId,
        stage: StageId,
        text: &str,
    ) -> Result<(), CustodyError> {
        self.record_stage_details(caller, item, stage, text, NoteMode::InsertOnly)
            .map(|_| ())
    }

    /// Create or replace a stage note.
    fn update_stage_details(
        &self,
        caller: Address,
        item: EvidenceId,
        stage: StageId,
        text: &str,
    ) -> Result<(), CustodyError> {
        self.record_stage_details(caller, item, stage, text, NoteMode::Upsert)
            .map(|_| ())
    }

    /// Rename an evidence item. Authorized only.
    fn update_evidence_item(
        &self,
        caller: Address,
        id: EvidenceId,
        new_name: &str,
    ) -> Result<(), CustodyError>;

    /// Note slot of one stage of an item.
    fn stage_details(&self, item: EvidenceId, stage: StageId)
        -> Result<StageDetails, CustodyError>;

    /// Number of recorded notes of an item.
    fn stage_count(&self, item: EvidenceId) -> Result<usize, CustodyError>;

    /// Time of the latest note write for a stage.
    fn stage_update_time(&self, item: EvidenceId, stage: StageId)
        -> Result<Timestamp, CustodyError>;

    /// An item with one entry per catalog stage.
    fn evidence_item_details(&self, item: EvidenceId)
        -> Result<EvidenceItemDetails, CustodyError>;

    /// Look up an item.
    fn evidence_item(&self, id: EvidenceId) -> Result<EvidenceItem, CustodyError>;

    /// All items in insertion order.
    fn all_evidence_items(&self) -> Vec<EvidenceItem>;

    /// Number of items.
    fn evidence_item_count(&self) -> usize;

    /// Items `[start, end)` as parallel columns.
    fn evidence_items_in_range(
        &self,
        start: usize,
        end: usize,
    ) -> Result<EvidenceItemPage, CustodyError>;
}

/// Case registry API - inbound port.
pub trait CaseRegistryApi: AccessControlApi {
    /// Case handle type produced by the registry.
    type Case: CaseApi;

    /// Reference of the registry itself, the base of case addresses.
    fn registry_address(&self) -> Address;

    /// Deploy a case. Authorized only. An empty `stages` falls back to the
    /// registry's configured case stages.
    fn deploy_case(
        &self,
        caller: Address,
        case_id: CaseId,
        owner: Address,
        stages: Vec<String>,
    ) -> Result<Arc<Self::Case>, CustodyError>;

    /// Bookkeeping record of a case.
    fn case_record(&self, case_id: CaseId) -> Result<CaseRecord, CustodyError>;

    /// Handle of a deployed case.
    fn case(&self, case_id: CaseId) -> Result<Arc<Self::Case>, CustodyError>;

    /// Re-enable a disabled case. Admin only.
    fn enable_case(&self, caller: Address, case_id: CaseId) -> Result<(), CustodyError>;

    /// Disable an active case. Admin only.
    fn disable_case(&self, caller: Address, case_id: CaseId) -> Result<(), CustodyError>;

    /// Enabled flag of a case.
    fn case_status(&self, case_id: CaseId) -> Result<bool, CustodyError>;

    /// Number of deployed cases.
    fn case_count(&self) -> usize;

    /// All case records in deployment order.
    fn all_cases(&self) -> Vec<CaseRecord>;

    /// Records `[start, end)` as parallel columns.
    fn cases_in_range(&self, start: usize, end: usize) -> Result<CasePage, CustodyError>;

    /// Record that the caller accessed a case.
    fn record_access(&self, caller: Address, case_id: CaseId) -> Result<Timestamp, CustodyError>;

    /// Latest access of one identity to a case.
    fn access_record(
        &self,
        case_id: CaseId,
        accessor: &Address,
    ) -> Result<AccessRecord, CustodyError>;

    /// All access records of a case in first-access order.
    fn access_records(&self, case_id: CaseId) -> Result<Vec<AccessRecord>, CustodyError>;

    /// Replace the default stages of future cases. Admin only.
    fn set_case_stages(&self, caller: Address, stages: Vec<String>) -> Result<(), CustodyError>;

    /// Default stages of future cases.
    fn case_stages(&self) -> Vec<String>;
}
