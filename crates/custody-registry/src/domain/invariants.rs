//! Domain invariants for the custody registries.
//!
//! Each check returns `true` when the invariant holds. Services assert them
//! in debug builds after every committed mutation.

use super::entities::{CaseRecord, EvidenceItem};
use super::stage_catalog::StageCatalog;
use std::collections::HashSet;

/// INVARIANT-1: Stage ids are dense and equal to their catalog position.
pub fn invariant_sequential_stage_ids(catalog: &StageCatalog) -> bool {
    catalog
        .stages()
        .iter()
        .enumerate()
        .all(|(i, s)| usize::try_from(s.id).is_ok_and(|id| id == i))
}

/// INVARIANT-2: Evidence item ids are unique within a case.
pub fn invariant_unique_evidence_ids(items: &[EvidenceItem]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item.id))
}

/// INVARIANT-3: Notes only exist for stages of the catalog.
pub fn invariant_notes_within_catalog(items: &[EvidenceItem], catalog: &StageCatalog) -> bool {
    items
        .iter()
        .all(|item| item.notes.keys().all(|stage| catalog.contains(*stage)))
}

/// INVARIANT-4: Case ids are unique and every case has a non-zero reference.
pub fn invariant_unique_cases(records: &[CaseRecord]) -> bool {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .all(|r| !r.case_address.is_zero() && seen.insert(r.case_id))
}
