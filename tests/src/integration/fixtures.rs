//! Shared wiring for the integration flows.

use custody_registry::{AccountsService, CaseRegistryService, FixedTimeSource, RegistryConfig};
use shared_bus::InMemoryEventBus;
use shared_types::entities::Address;
use std::sync::Arc;

/// Factory admin.
pub const ADMIN: Address = Address::new([0xA1; 20]);
/// Case owner.
pub const OWNER: Address = Address::new([0x0E; 20]);
/// Investigator authorized in a case.
pub const INVESTIGATOR: Address = Address::new([0x11; 20]);
/// Identity with no role anywhere.
pub const STRANGER: Address = Address::new([0x5A; 20]);

/// Clock start of every flow.
pub const GENESIS_TIME: u64 = 1_700_000_000;

/// Registries wired to one bus and one clock.
pub struct TestNet {
    pub bus: Arc<InMemoryEventBus>,
    pub clock: Arc<FixedTimeSource>,
    pub accounts: AccountsService,
    pub registry: CaseRegistryService,
}

impl TestNet {
    /// Default registry configuration (seven standard stages).
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let bus = Arc::new(InMemoryEventBus::new());
        let clock = Arc::new(FixedTimeSource::new(GENESIS_TIME));
        let accounts = AccountsService::new(ADMIN, bus.clone(), clock.clone());
        let registry = CaseRegistryService::new(ADMIN, config, bus.clone(), clock.clone());
        Self {
            bus,
            clock,
            accounts,
            registry,
        }
    }
}

impl Default for TestNet {
    fn default() -> Self {
        Self::new()
    }
}
