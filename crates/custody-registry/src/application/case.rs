//! Case Service
//!
//! A deployed case: its own access control, stage catalog and evidence
//! registry behind a single lock.

use super::{change_admin, change_authorization, log_rejection};
use crate::domain::{
    invariant_notes_within_catalog, invariant_sequential_stage_ids, invariant_unique_evidence_ids,
    AccessControl, CallContext, CustodyError, EvidenceItem, EvidenceItemDetails, EvidenceItemPage,
    EvidenceRegistry, NoteMode, NoteOutcome, StageCatalog, StageDetails,
};
use crate::ports::inbound::{AccessControlApi, CaseApi};
use crate::ports::outbound::{EventPublisher, TimeSource};
use parking_lot::RwLock;
use shared_bus::{CustodyEvent, RegistryScope};
use shared_types::entities::{Address, CaseId, EvidenceId, StageId, Timestamp};
use std::sync::Arc;
use tracing::{debug, info};

struct CaseState {
    access: AccessControl,
    stages: StageCatalog,
    evidence: EvidenceRegistry,
}

/// A deployed case.
///
/// Shared as `Arc<Case>`. The enabled flag lives in the registry that
/// deployed the case; the handle itself serves calls either way.
pub struct Case {
    case_id: CaseId,
    case_address: Address,
    state: RwLock<CaseState>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn TimeSource>,
}

impl Case {
    /// Create a case with the given access control and stage catalog and
    /// no evidence.
    pub fn new(
        case_id: CaseId,
        case_address: Address,
        access: AccessControl,
        stages: StageCatalog,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            case_id,
            case_address,
            state: RwLock::new(CaseState {
                access,
                stages,
                evidence: EvidenceRegistry::new(),
            }),
            publisher,
            clock,
        }
    }

    /// Derived reference of this case.
    pub fn case_address(&self) -> Address {
        self.case_address
    }

    fn scope(&self) -> RegistryScope {
        RegistryScope::Case(self.case_id)
    }
}

impl AccessControlApi for Case {
    fn admin(&self) -> Address {
        self.state.read().access.admin()
    }

    fn is_authorized(&self, id: &Address) -> bool {
        self.state.read().access.is_authorized(id)
    }

    fn authorized_users(&self) -> Vec<Address> {
        self.state.read().access.authorized_users()
    }

    fn set_admin(&self, caller: Address, new_admin: Address) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        change_admin(
            &mut state.access,
            self.scope(),
            caller,
            new_admin,
            now,
            self.publisher.as_ref(),
        )
    }

    fn add_authorized_user(&self, caller: Address, id: Address) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        change_authorization(
            &mut state.access,
            self.scope(),
            caller,
            id,
            true,
            now,
            self.publisher.as_ref(),
        )
    }

    fn remove_authorized_user(&self, caller: Address, id: Address) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        change_authorization(
            &mut state.access,
            self.scope(),
            caller,
            id,
            false,
            now,
            self.publisher.as_ref(),
        )
    }
}

impl CaseApi for Case {
    fn case_id(&self) -> CaseId {
        self.case_id
    }

    fn add_new_stage(&self, caller: Address, name: &str) -> Result<StageId, CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        let stage_id = state
            .stages
            .add_new_stage(&ctx, name)
            .inspect_err(log_rejection("add_new_stage", caller))?;
        debug_assert!(invariant_sequential_stage_ids(&state.stages));

        info!(case_id = self.case_id, stage_id, name, "[custody] Stage added");
        self.publisher.publish(CustodyEvent::StageAdded {
            case_id: self.case_id,
            stage_id,
            name: name.to_string(),
            timestamp: now,
        });
        Ok(stage_id)
    }

    fn update_stage_name(
        &self,
        caller: Address,
        id: StageId,
        name: &str,
    ) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        state
            .stages
            .update_stage_name(&ctx, id, name)
            .inspect_err(log_rejection("update_stage_name", caller))?;

        info!(case_id = self.case_id, stage_id = id, name, "[custody] Stage renamed");
        self.publisher.publish(CustodyEvent::StageRenamed {
            case_id: self.case_id,
            stage_id: id,
            name: name.to_string(),
            timestamp: now,
        });
        Ok(())
    }

    fn stage_name(&self, id: StageId) -> Result<String, CustodyError> {
        self.state.read().stages.stage_name(id).map(str::to_string)
    }

    fn stage_names(&self) -> Vec<String> {
        self.state.read().stages.stage_names()
    }

    fn add_evidence_item(
        &self,
        caller: Address,
        id: EvidenceId,
        name: &str,
    ) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        state
            .evidence
            .add_evidence_item(&ctx, id, name)
            .inspect_err(log_rejection("add_evidence_item", caller))?;
        debug_assert!(invariant_unique_evidence_ids(
            state.evidence.all_evidence_items()
        ));

        info!(case_id = self.case_id, item_id = id, name, "[custody] Evidence item added");
        self.publisher.publish(CustodyEvent::EvidenceItemAdded {
            case_id: self.case_id,
            item_id: id,
            name: name.to_string(),
            timestamp: now,
        });
        Ok(())
    }

    fn record_stage_details(
        &self,
        caller: Address,
        item: EvidenceId,
        stage: StageId,
        text: &str,
        mode: NoteMode,
    ) -> Result<NoteOutcome, CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        let outcome = state
            .evidence
            .record_stage_details(&ctx, &state.stages, item, stage, text, mode)
            .inspect_err(log_rejection("record_stage_details", caller))?;
        debug_assert!(invariant_notes_within_catalog(
            state.evidence.all_evidence_items(),
            &state.stages
        ));

        info!(
            case_id = self.case_id,
            item_id = item,
            stage_id = stage,
            outcome = ?outcome,
            "[custody] Stage details recorded"
        );
        self.publisher.publish(CustodyEvent::StageDetailsUpdated {
            case_id: self.case_id,
            item_id: item,
            stage_id: stage,
            timestamp: now,
        });
        Ok(outcome)
    }

    fn update_evidence_item(
        &self,
        caller: Address,
        id: EvidenceId,
        new_name: &str,
    ) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        state
            .evidence
            .update_evidence_item(&ctx, id, new_name)
            .inspect_err(log_rejection("update_evidence_item", caller))?;

        info!(case_id = self.case_id, item_id = id, name = new_name, "[custody] Evidence item renamed");
        self.publisher.publish(CustodyEvent::EvidenceItemRenamed {
            case_id: self.case_id,
            item_id: id,
            name: new_name.to_string(),
            timestamp: now,
        });
        Ok(())
    }

    fn stage_details(
        &self,
        item: EvidenceId,
        stage: StageId,
    ) -> Result<StageDetails, CustodyError> {
        let state = self.state.read();
        state.evidence.stage_details(&state.stages, item, stage)
    }

    fn stage_count(&self, item: EvidenceId) -> Result<usize, CustodyError> {
        self.state.read().evidence.stage_count(item)
    }

    fn stage_update_time(
        &self,
        item: EvidenceId,
        stage: StageId,
    ) -> Result<Timestamp, CustodyError> {
        self.state.read().evidence.stage_update_time(item, stage)
    }

    fn evidence_item_details(&self, item: EvidenceId) -> Result<EvidenceItemDetails, CustodyError> {
        let state = self.state.read();
        state.evidence.evidence_item_details(&state.stages, item)
    }

    fn evidence_item(&self, id: EvidenceId) -> Result<EvidenceItem, CustodyError> {
        self.state.read().evidence.evidence_item(id).cloned()
    }

    fn all_evidence_items(&self) -> Vec<EvidenceItem> {
        self.state.read().evidence.all_evidence_items().to_vec()
    }

    fn evidence_item_count(&self) -> usize {
        self.state.read().evidence.evidence_item_count()
    }

    fn evidence_items_in_range(
        &self,
        start: usize,
        end: usize,
    ) -> Result<EvidenceItemPage, CustodyError> {
        let page = self.state.read().evidence.evidence_items_in_range(start, end)?;
        debug!(case_id = self.case_id, start, end, rows = page.len(), "[custody] Evidence page read");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedTimeSource;
    use crate::domain::{Entity, Role};
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};

    const OWNER: Address = Address::new([1; 20]);
    const AGENT: Address = Address::new([2; 20]);
    const STRANGER: Address = Address::new([3; 20]);

    struct Fixture {
        case: Case,
        bus: Arc<InMemoryEventBus>,
        clock: Arc<FixedTimeSource>,
    }

    fn fixture() -> Fixture {
        let bus = Arc::new(InMemoryEventBus::new());
        let clock = Arc::new(FixedTimeSource::new(500));
        let case = Case::new(
            1,
            Address::new([0xca; 20]),
            AccessControl::with_authorized(OWNER, [AGENT]),
            StageCatalog::from_names(["Identification", "Collection", "Analysis"]),
            bus.clone(),
            clock.clone(),
        );
        Fixture { case, bus, clock }
    }

    #[test]
    fn test_evidence_flow() {
        let f = fixture();
        let mut sub = f.bus.subscribe(EventFilter::topics(vec![EventTopic::Evidence]));

        f.case.add_evidence_item(AGENT, 1000, "Logs").unwrap();
        f.clock.advance(10);
        f.case.add_stage_details(AGENT, 1000, 0, "note").unwrap();

        let details = f.case.stage_details(1000, 0).unwrap();
        assert_eq!(details.stage_name, "Identification");
        assert_eq!(details.note.as_deref(), Some("note"));
        assert_eq!(f.case.stage_update_time(1000, 0), Ok(510));

        assert_eq!(
            f.case.add_stage_details(AGENT, 1000, 0, "again"),
            Err(CustodyError::AlreadySet {
                item: 1000,
                stage: 0
            })
        );

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            CustodyEvent::StageDetailsUpdated {
                case_id: 1,
                item_id: 1000,
                stage_id: 0,
                timestamp: 510
            }
        );
    }

    #[test]
    fn test_update_stage_details_upserts() {
        let f = fixture();
        f.case.add_evidence_item(AGENT, 7, "Phone").unwrap();

        f.case.update_stage_details(AGENT, 7, 2, "first").unwrap();
        f.case.update_stage_details(AGENT, 7, 2, "second").unwrap();

        assert_eq!(f.case.stage_count(7), Ok(1));
        assert_eq!(
            f.case.stage_details(7, 2).unwrap().note.as_deref(),
            Some("second")
        );
    }

    #[test]
    fn test_stranger_mutations_rejected() {
        let f = fixture();
        let mut sub = f.bus.subscribe(EventFilter::all());

        assert_eq!(
            f.case.add_evidence_item(STRANGER, 1, "Disk"),
            Err(CustodyError::unauthorized(STRANGER, Role::Authorized))
        );
        assert!(f.case.add_new_stage(AGENT, "Archiving").is_err());
        assert!(f.case.add_authorized_user(AGENT, STRANGER).is_err());

        assert_eq!(f.case.evidence_item_count(), 0);
        assert_eq!(f.case.stage_names().len(), 3);
        assert!(!f.case.is_authorized(&STRANGER));
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_stage_catalog_management() {
        let f = fixture();

        assert_eq!(f.case.add_new_stage(OWNER, "Archiving"), Ok(3));
        f.case.update_stage_name(OWNER, 0, "Triage").unwrap();

        assert_eq!(f.case.stage_name(0), Ok("Triage".to_string()));
        assert_eq!(f.case.stage_name(3), Ok("Archiving".to_string()));
        assert_eq!(
            f.case.stage_name(4),
            Err(CustodyError::NotFound(Entity::Stage(4)))
        );
    }

    #[test]
    fn test_authorization_events_only_on_change() {
        let f = fixture();
        let mut sub = f
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::AccessControl]));

        f.case.add_authorized_user(OWNER, STRANGER).unwrap();
        f.case.add_authorized_user(OWNER, STRANGER).unwrap();
        f.case.remove_authorized_user(OWNER, STRANGER).unwrap();
        f.case.remove_authorized_user(OWNER, STRANGER).unwrap();

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            CustodyEvent::AuthorizationChanged {
                scope: RegistryScope::Case(1),
                authorized: true,
                ..
            }
        ));
        assert!(matches!(
            events[1],
            CustodyEvent::AuthorizationChanged {
                authorized: false,
                ..
            }
        ));
    }

    #[test]
    fn test_item_rename_and_pages() {
        let f = fixture();
        for id in [3, 1, 2] {
            f.case.add_evidence_item(AGENT, id, "item").unwrap();
        }
        f.case.update_evidence_item(AGENT, 1, "renamed").unwrap();

        let page = f.case.evidence_items_in_range(0, 2).unwrap();
        assert_eq!(page.ids, vec![3, 1]);
        assert_eq!(page.names[1], "renamed");

        let details = f.case.evidence_item_details(1).unwrap();
        assert_eq!(details.stages.len(), 3);
        assert_eq!(details.added_at, 500);

        assert_eq!(f.case.all_evidence_items().len(), 3);
        assert_eq!(f.case.evidence_item(2).unwrap().name, "item");
    }

    #[test]
    fn test_case_admin_handover() {
        let f = fixture();
        f.case.set_admin(OWNER, AGENT).unwrap();

        assert_eq!(f.case.admin(), AGENT);
        assert_eq!(f.case.add_new_stage(AGENT, "Review"), Ok(3));
        assert!(f.case.add_new_stage(OWNER, "Other").is_err());
        assert_eq!(f.case.case_id(), 1);
        assert_eq!(f.case.case_address(), Address::new([0xca; 20]));
    }

    #[tokio::test]
    async fn test_case_events_reach_stream_subscriber() {
        use std::time::Duration;
        use tokio::time::timeout;
        use tokio_stream::StreamExt;

        let f = fixture();
        let mut stream = f.bus.event_stream(EventFilter::for_cases(vec![1]));

        let _ = f.case.add_evidence_item(STRANGER, 9, "Rejected");
        f.case.add_evidence_item(AGENT, 9, "Camera").unwrap();

        let event = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout waiting for event")
            .expect("stream ended");
        assert_eq!(
            event,
            CustodyEvent::EvidenceItemAdded {
                case_id: 1,
                item_id: 9,
                name: "Camera".to_string(),
                timestamp: 500,
            }
        );
    }
}
