//! # Case Directory
//!
//! The registry's bookkeeping for deployed cases: one record per case id in
//! deployment order, the enabled flag, and the per-identity access log.

use super::access_control::CallContext;
use super::entities::{AccessRecord, CasePage, CaseRecord};
use super::errors::CustodyError;
use super::value_objects::Entity;
use crate::algorithms::range_query::select_range;
use shared_types::entities::{Address, CaseId, Timestamp};
use std::collections::HashMap;

/// Case records plus the access log.
#[derive(Debug, Clone, Default)]
pub struct CaseDirectory {
    records: Vec<CaseRecord>,
    index: HashMap<CaseId, usize>,
    access_log: HashMap<CaseId, Vec<AccessRecord>>,
}

impl CaseDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, case_id: CaseId) -> Result<usize, CustodyError> {
        self.index
            .get(&case_id)
            .copied()
            .ok_or(CustodyError::NotFound(Entity::Case(case_id)))
    }

    /// Record a new active case deployed at `ctx.now`.
    pub fn register(
        &mut self,
        ctx: &CallContext<'_>,
        case_id: CaseId,
        case_address: Address,
        owner: Address,
    ) -> Result<&CaseRecord, CustodyError> {
        ctx.require_authorized()?;
        if owner.is_zero() {
            return Err(CustodyError::InvalidIdentity { field: "owner" });
        }
        if self.index.contains_key(&case_id) {
            return Err(CustodyError::DuplicateId(Entity::Case(case_id)));
        }

        let pos = self.records.len();
        self.index.insert(case_id, pos);
        self.records.push(CaseRecord {
            case_id,
            case_address,
            owner,
            deployed_at: ctx.now,
            active: true,
        });
        Ok(&self.records[pos])
    }

    /// Look up a case record.
    pub fn case_record(&self, case_id: CaseId) -> Result<&CaseRecord, CustodyError> {
        self.position(case_id).map(|i| &self.records[i])
    }

    /// Flip a case's enabled flag. Admin only; a no-op flip is an error.
    pub fn set_active(
        &mut self,
        ctx: &CallContext<'_>,
        case_id: CaseId,
        active: bool,
    ) -> Result<(), CustodyError> {
        ctx.require_admin()?;
        let pos = self.position(case_id)?;

        let record = &mut self.records[pos];
        match (record.active, active) {
            (true, true) => Err(CustodyError::AlreadyActive(case_id)),
            (false, false) => Err(CustodyError::AlreadyInactive(case_id)),
            _ => {
                record.active = active;
                Ok(())
            }
        }
    }

    /// Enabled flag of a case.
    pub fn case_status(&self, case_id: CaseId) -> Result<bool, CustodyError> {
        self.case_record(case_id).map(|r| r.active)
    }

    /// Number of deployed cases.
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.records.len()
    }

    /// All records in deployment order.
    #[must_use]
    pub fn all_cases(&self) -> &[CaseRecord] {
        &self.records
    }

    /// Records `[start, end)` in deployment order, as parallel columns.
    pub fn cases_in_range(&self, start: usize, end: usize) -> Result<CasePage, CustodyError> {
        Ok(select_range(&self.records, start, end)?.iter().collect())
    }

    /// Record that the caller accessed a case, overwriting its previous
    /// record.
    pub fn record_access(
        &mut self,
        ctx: &CallContext<'_>,
        case_id: CaseId,
    ) -> Result<Timestamp, CustodyError> {
        if ctx.caller.is_zero() {
            return Err(CustodyError::InvalidIdentity { field: "caller" });
        }
        self.position(case_id)?;

        let log = self.access_log.entry(case_id).or_default();
        match log.iter_mut().find(|r| r.accessor == ctx.caller) {
            Some(existing) => existing.accessed_at = ctx.now,
            None => log.push(AccessRecord {
                case_id,
                accessor: ctx.caller,
                accessed_at: ctx.now,
            }),
        }
        Ok(ctx.now)
    }

    /// Latest access of `accessor` to a case.
    pub fn access_record(
        &self,
        case_id: CaseId,
        accessor: &Address,
    ) -> Result<AccessRecord, CustodyError> {
        self.position(case_id)?;
        self.access_log
            .get(&case_id)
            .and_then(|log| log.iter().find(|r| r.accessor == *accessor))
            .copied()
            .ok_or(CustodyError::NotFound(Entity::AccessRecord {
                case_id,
                accessor: *accessor,
            }))
    }

    /// All access records of a case in first-access order.
    pub fn access_records(&self, case_id: CaseId) -> Result<Vec<AccessRecord>, CustodyError> {
        self.position(case_id)?;
        Ok(self.access_log.get(&case_id).cloned().unwrap_or_default())
    }
}
