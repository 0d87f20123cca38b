//! # Service Container
//!
//! Creates the event bus and the registries and holds the shared handles.
//!
//! ## Initialization Order
//!
//! 1. Event bus and clock (shared infrastructure)
//! 2. Accounts registry
//! 3. Case registry, then its startup authorized set

use super::config::NodeConfig;
use custody_registry::{
    AccessControlApi, AccountsService, CaseRegistryApi, CaseRegistryService, CustodyError,
    SystemTimeSource, TimeSource,
};
use shared_bus::InMemoryEventBus;
use std::sync::Arc;
use tracing::info;

/// All services of a running node.
pub struct ServiceContainer {
    /// Shared event bus.
    pub bus: Arc<InMemoryEventBus>,
    /// Clock used by every registry.
    pub clock: Arc<dyn TimeSource>,
    /// User accounts.
    pub accounts: Arc<AccountsService>,
    /// Case registry.
    pub registry: Arc<CaseRegistryService>,
    /// Configuration the container was built from.
    pub config: NodeConfig,
}

impl ServiceContainer {
    /// Build every service with the system clock.
    pub fn new(config: NodeConfig) -> Result<Self, CustodyError> {
        Self::with_clock(config, Arc::new(SystemTimeSource))
    }

    /// Build every service with the given clock.
    pub fn with_clock(config: NodeConfig, clock: Arc<dyn TimeSource>) -> Result<Self, CustodyError> {
        info!("[custody] Initializing services");

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus_capacity));

        let accounts = Arc::new(AccountsService::new(
            config.admin,
            bus.clone(),
            clock.clone(),
        ));

        let registry = Arc::new(CaseRegistryService::new(
            config.admin,
            config.registry.clone(),
            bus.clone(),
            clock.clone(),
        ));
        for user in &config.authorized_users {
            registry.add_authorized_user(config.admin, *user)?;
        }

        info!(
            registry = %registry.registry_address(),
            authorized = config.authorized_users.len(),
            "[custody] Services ready"
        );

        Ok(Self {
            bus,
            clock,
            accounts,
            registry,
            config,
        })
    }
}
