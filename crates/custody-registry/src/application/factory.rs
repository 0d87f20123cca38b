//! Case Registry Service
//!
//! Main service implementing CaseRegistryApi. Deploys cases, keeps their
//! bookkeeping records and the access log, and hands out case handles.

use super::case::Case;
use super::{change_admin, change_authorization, log_rejection};
use crate::algorithms::case_address::{compute_case_address, compute_registry_address};
use crate::config::RegistryConfig;
use crate::domain::{
    invariant_unique_cases, AccessControl, AccessRecord, CallContext, CaseDirectory, CasePage,
    CaseRecord, CustodyError, Entity, StageCatalog,
};
use crate::ports::inbound::{AccessControlApi, CaseRegistryApi};
use crate::ports::outbound::{EventPublisher, TimeSource};
use parking_lot::RwLock;
use shared_bus::{CustodyEvent, RegistryScope};
use shared_types::entities::{Address, CaseId, Timestamp};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

struct FactoryState {
    access: AccessControl,
    case_stages: Vec<String>,
    directory: CaseDirectory,
    handles: HashMap<CaseId, Arc<Case>>,
}

/// Case Registry Service
///
/// Every deployed case gets its own lock. This service's lock is never held
/// while a case lock is taken.
pub struct CaseRegistryService {
    address: Address,
    authorize_deployer: bool,
    state: RwLock<FactoryState>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn TimeSource>,
}

impl CaseRegistryService {
    /// Create a registry administered by `admin`, with its reference derived
    /// from the admin identity.
    pub fn new(
        admin: Address,
        config: RegistryConfig,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let address = compute_registry_address(&admin, 0);
        Self::with_address(address, admin, config, publisher, clock)
    }

    /// Create a registry with an explicit reference.
    pub fn with_address(
        address: Address,
        admin: Address,
        config: RegistryConfig,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        info!(
            registry = %address,
            admin = %admin,
            stages = config.case_stages.len(),
            "[custody] Case registry created"
        );
        Self {
            address,
            authorize_deployer: config.authorize_deployer,
            state: RwLock::new(FactoryState {
                access: AccessControl::new(admin),
                case_stages: config.case_stages,
                directory: CaseDirectory::new(),
                handles: HashMap::new(),
            }),
            publisher,
            clock,
        }
    }
}

impl AccessControlApi for CaseRegistryService {
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
            RegistryScope::CaseRegistry,
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
            RegistryScope::CaseRegistry,
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
            RegistryScope::CaseRegistry,
            caller,
            id,
            false,
            now,
            self.publisher.as_ref(),
        )
    }
}

impl CaseRegistryApi for CaseRegistryService {
    type Case = Case;

    fn registry_address(&self) -> Address {
        self.address
    }

    fn deploy_case(
        &self,
        caller: Address,
        case_id: CaseId,
        owner: Address,
        stages: Vec<String>,
    ) -> Result<Arc<Case>, CustodyError> {
        let now = self.clock.now();
        let case_address = compute_case_address(&self.address, case_id);

        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        let record = state
            .directory
            .register(&ctx, case_id, case_address, owner)
            .inspect_err(log_rejection("deploy_case", caller))?
            .clone();
        debug_assert!(invariant_unique_cases(state.directory.all_cases()));

        let catalog = if stages.is_empty() {
            StageCatalog::from_names(state.case_stages.iter().cloned())
        } else {
            StageCatalog::from_names(stages)
        };
        let access = if self.authorize_deployer && caller != owner {
            AccessControl::with_authorized(owner, [caller])
        } else {
            AccessControl::new(owner)
        };
        let case = Arc::new(Case::new(
            case_id,
            case_address,
            access,
            catalog,
            self.publisher.clone(),
            self.clock.clone(),
        ));
        state.handles.insert(case_id, case.clone());

        info!(
            case_id,
            case_address = %record.case_address,
            owner = %owner,
            deployer = %caller,
            "[custody] Case deployed"
        );
        self.publisher.publish(CustodyEvent::CaseDeployed {
            case_id,
            case_address: record.case_address,
            owner,
            timestamp: now,
        });
        Ok(case)
    }

    fn case_record(&self, case_id: CaseId) -> Result<CaseRecord, CustodyError> {
        self.state.read().directory.case_record(case_id).cloned()
    }

    fn case(&self, case_id: CaseId) -> Result<Arc<Case>, CustodyError> {
        self.state
            .read()
            .handles
            .get(&case_id)
            .cloned()
            .ok_or(CustodyError::NotFound(Entity::Case(case_id)))
    }

    fn enable_case(&self, caller: Address, case_id: CaseId) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        state
            .directory
            .set_active(&ctx, case_id, true)
            .inspect_err(log_rejection("enable_case", caller))?;

        info!(case_id, "[custody] Case enabled");
        self.publisher.publish(CustodyEvent::CaseEnabled {
            case_id,
            timestamp: now,
        });
        Ok(())
    }

    fn disable_case(&self, caller: Address, case_id: CaseId) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        state
            .directory
            .set_active(&ctx, case_id, false)
            .inspect_err(log_rejection("disable_case", caller))?;

        info!(case_id, "[custody] Case disabled");
        self.publisher.publish(CustodyEvent::CaseDisabled {
            case_id,
            timestamp: now,
        });
        Ok(())
    }

    fn case_status(&self, case_id: CaseId) -> Result<bool, CustodyError> {
        self.state.read().directory.case_status(case_id)
    }

    fn case_count(&self) -> usize {
        self.state.read().directory.case_count()
    }

    fn all_cases(&self) -> Vec<CaseRecord> {
        self.state.read().directory.all_cases().to_vec()
    }

    fn cases_in_range(&self, start: usize, end: usize) -> Result<CasePage, CustodyError> {
        let page = self.state.read().directory.cases_in_range(start, end)?;
        debug!(start, end, rows = page.len(), "[custody] Case page read");
        Ok(page)
    }

    fn record_access(&self, caller: Address, case_id: CaseId) -> Result<Timestamp, CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        let timestamp = state
            .directory
            .record_access(&ctx, case_id)
            .inspect_err(log_rejection("record_access", caller))?;

        debug!(case_id, accessor = %caller, "[custody] Case accessed");
        self.publisher.publish(CustodyEvent::CaseAccessed {
            case_id,
            accessor: caller,
            timestamp,
        });
        Ok(timestamp)
    }

    fn access_record(
        &self,
        case_id: CaseId,
        accessor: &Address,
    ) -> Result<AccessRecord, CustodyError> {
        self.state.read().directory.access_record(case_id, accessor)
    }

    fn access_records(&self, case_id: CaseId) -> Result<Vec<AccessRecord>, CustodyError> {
        self.state.read().directory.access_records(case_id)
    }

    fn set_case_stages(&self, caller: Address, stages: Vec<String>) -> Result<(), CustodyError> {
        let mut state = self.state.write();
        state
            .access
            .require_admin(&caller)
            .inspect_err(log_rejection("set_case_stages", caller))?;

        info!(stages = stages.len(), "[custody] Default case stages replaced");
        state.case_stages = stages;
        Ok(())
    }

    fn case_stages(&self) -> Vec<String> {
        self.state.read().case_stages.clone()
    }
}
