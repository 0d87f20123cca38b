//! # Genesis Case
//!
//! Deploys the configured startup case, unless a case with that id already
//! exists.

use crate::container::GenesisCaseConfig;
use custody_registry::{Case, CaseRegistryApi, CaseRegistryService, CustodyError};
use shared_types::entities::Address;
use std::sync::Arc;
use tracing::info;

/// Deploy the genesis case as `admin`. Returns the existing handle if the
/// case was already deployed.
pub fn deploy_genesis_case(
    registry: &CaseRegistryService,
    admin: Address,
    genesis: &GenesisCaseConfig,
) -> Result<Arc<Case>, CustodyError> {
    if let Ok(existing) = registry.case(genesis.case_id) {
        info!(case_id = genesis.case_id, "[custody] Genesis case found");
        return Ok(existing);
    }

    let owner = genesis.owner.unwrap_or(admin);
    let case = registry.deploy_case(admin, genesis.case_id, owner, genesis.stages.clone())?;
    info!(
        case_id = genesis.case_id,
        owner = %owner,
        "[custody] Genesis case deployed"
    );
    Ok(case)
}
