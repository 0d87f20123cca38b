//! # Evidence Registry
//!
//! Evidence items of one case and their per-stage notes. Mutations require
//! the authorized role; stage references are checked against the case's
//! [`StageCatalog`].

use super::access_control::CallContext;
use super::entities::{EvidenceItem, EvidenceItemDetails, EvidenceItemPage, StageDetails, StageNote};
use super::errors::CustodyError;
use super::stage_catalog::StageCatalog;
use super::value_objects::{Entity, NoteMode, NoteOutcome};
use crate::algorithms::range_query::select_range;
use shared_types::entities::{EvidenceId, StageId, Timestamp};
use std::collections::btree_map::Entry;
use std::collections::HashMap;

/// Evidence items in insertion order plus an id index.
#[derive(Debug, Clone, Default)]
pub struct EvidenceRegistry {
    items: Vec<EvidenceItem>,
    index: HashMap<EvidenceId, usize>,
}

impl EvidenceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: EvidenceId) -> Result<usize, CustodyError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(CustodyError::NotFound(Entity::EvidenceItem(id)))
    }

    /// Look up an item.
    pub fn evidence_item(&self, id: EvidenceId) -> Result<&EvidenceItem, CustodyError> {
        self.position(id).map(|i| &self.items[i])
    }

    /// Register a new item with no notes.
    pub fn add_evidence_item(
        &mut self,
        ctx: &CallContext<'_>,
        id: EvidenceId,
        name: &str,
    ) -> Result<(), CustodyError> {
        ctx.require_authorized()?;
        if self.index.contains_key(&id) {
            return Err(CustodyError::DuplicateId(Entity::EvidenceItem(id)));
        }

        self.index.insert(id, self.items.len());
        self.items.push(EvidenceItem::new(id, name, ctx.now));
        Ok(())
    }

    /// Write the note of one stage of an item.
    ///
    /// `InsertOnly` refuses to overwrite; `Upsert` creates or replaces. The
    /// stage must exist in `stages` in either mode.
    pub fn record_stage_details(
        &mut self,
        ctx: &CallContext<'_>,
        stages: &StageCatalog,
        item: EvidenceId,
        stage: StageId,
        text: &str,
        mode: NoteMode,
    ) -> Result<NoteOutcome, CustodyError> {
        ctx.require_authorized()?;
        let pos = self.position(item)?;
        if !stages.contains(stage) {
            return Err(CustodyError::NotFound(Entity::Stage(stage)));
        }

        let note = StageNote {
            text: text.to_string(),
            updated_at: ctx.now,
        };
        match (self.items[pos].notes.entry(stage), mode) {
            (Entry::Occupied(_), NoteMode::InsertOnly) => {
                Err(CustodyError::AlreadySet { item, stage })
            }
            (Entry::Occupied(mut existing), NoteMode::Upsert) => {
                existing.insert(note);
                Ok(NoteOutcome::Replaced)
            }
            (Entry::Vacant(slot), _) => {
                slot.insert(note);
                Ok(NoteOutcome::Created)
            }
        }
    }

    /// Rename an item. `added_at` is untouched.
    pub fn update_evidence_item(
        &mut self,
        ctx: &CallContext<'_>,
        id: EvidenceId,
        new_name: &str,
    ) -> Result<(), CustodyError> {
        ctx.require_authorized()?;
        let pos = self.position(id)?;
        self.items[pos].name = new_name.to_string();
        Ok(())
    }

    /// The note slot of one stage of an item.
    pub fn stage_details(
        &self,
        stages: &StageCatalog,
        item: EvidenceId,
        stage: StageId,
    ) -> Result<StageDetails, CustodyError> {
        let item = self.evidence_item(item)?;
        let stage_name = stages.stage_name(stage)?;
        Ok(details_for(item, stage, stage_name))
    }

    /// Number of stages of an item that have a note.
    pub fn stage_count(&self, item: EvidenceId) -> Result<usize, CustodyError> {
        self.evidence_item(item).map(EvidenceItem::stage_count)
    }

    /// Time of the latest note write for one stage of an item.
    pub fn stage_update_time(
        &self,
        item: EvidenceId,
        stage: StageId,
    ) -> Result<Timestamp, CustodyError> {
        self.evidence_item(item)?
            .note(stage)
            .map(|n| n.updated_at)
            .ok_or(CustodyError::NotFound(Entity::StageNote { item, stage }))
    }

    /// An item with one entry per catalog stage, recorded or not.
    pub fn evidence_item_details(
        &self,
        stages: &StageCatalog,
        item: EvidenceId,
    ) -> Result<EvidenceItemDetails, CustodyError> {
        let record = self.evidence_item(item)?;
        Ok(EvidenceItemDetails {
            id: record.id,
            name: record.name.clone(),
            added_at: record.added_at,
            stage_count: record.stage_count(),
            stages: stages
                .stages()
                .iter()
                .map(|s| details_for(record, s.id, &s.name))
                .collect(),
        })
    }

    /// All items in insertion order.
    #[must_use]
    pub fn all_evidence_items(&self) -> &[EvidenceItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn evidence_item_count(&self) -> usize {
        self.items.len()
    }

    /// Items `[start, end)` in insertion order, as parallel columns.
    pub fn evidence_items_in_range(
        &self,
        start: usize,
        end: usize,
    ) -> Result<EvidenceItemPage, CustodyError> {
        Ok(select_range(&self.items, start, end)?.iter().collect())
    }
}

fn details_for(item: &EvidenceItem, stage_id: StageId, stage_name: &str) -> StageDetails {
    let note = item.note(stage_id);
    StageDetails {
        stage_id,
        stage_name: stage_name.to_string(),
        note: note.map(|n| n.text.clone()),
        updated_at: note.map(|n| n.updated_at),
    }
}
