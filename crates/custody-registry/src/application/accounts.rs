//! Accounts Service
//!
//! Main service implementing AccountsApi.

use super::{change_admin, log_rejection};
use crate::domain::{AccessControl, CallContext, CustodyError, User, UserRegistry, UserStatus};
use crate::ports::inbound::AccountsApi;
use crate::ports::outbound::{EventPublisher, TimeSource};
use parking_lot::RwLock;
use shared_bus::{CustodyEvent, RegistryScope};
use shared_types::entities::{Address, Timestamp, UserId};
use std::sync::Arc;
use tracing::{debug, info};

struct AccountsState {
    access: AccessControl,
    users: UserRegistry,
}

/// Accounts Service
///
/// Owns the user registry and the admin role that governs it.
pub struct AccountsService {
    state: RwLock<AccountsState>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn TimeSource>,
}

impl AccountsService {
    /// Create an empty registry administered by `admin`.
    pub fn new(
        admin: Address,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        info!(admin = %admin, "[custody] Accounts registry created");
        Self {
            state: RwLock::new(AccountsState {
                access: AccessControl::new(admin),
                users: UserRegistry::new(),
            }),
            publisher,
            clock,
        }
    }
}

impl AccountsApi for AccountsService {
    fn admin(&self) -> Address {
        self.state.read().access.admin()
    }

    fn set_admin(&self, caller: Address, new_admin: Address) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        change_admin(
            &mut state.access,
            RegistryScope::Accounts,
            caller,
            new_admin,
            now,
            self.publisher.as_ref(),
        )
    }

    fn add_user(
        &self,
        caller: Address,
        address: Address,
        password_hash: &str,
    ) -> Result<UserId, CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        let user_id = state
            .users
            .add_user(&ctx, address, password_hash)
            .inspect_err(log_rejection("add_user", caller))?;

        info!(user_id, address = %address, "[custody] User added");
        self.publisher.publish(CustodyEvent::UserAdded {
            user_id,
            address,
            timestamp: now,
        });
        Ok(user_id)
    }

    fn get_user(&self, id: UserId) -> Result<User, CustodyError> {
        self.state.read().users.get_user(id)
    }

    fn user_status(&self, id: UserId) -> UserStatus {
        self.state.read().users.user_status(id)
    }

    fn update_user(
        &self,
        caller: Address,
        id: UserId,
        new_address: Option<Address>,
        new_hash: &str,
    ) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        state
            .users
            .update_user(&ctx, id, new_address, new_hash)
            .inspect_err(log_rejection("update_user", caller))?;

        info!(user_id = id, address_changed = new_address.is_some(), "[custody] User updated");
        self.publisher.publish(CustodyEvent::UserUpdated {
            user_id: id,
            timestamp: now,
        });
        Ok(())
    }

    fn remove_user(&self, caller: Address, id: UserId) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        state
            .users
            .remove_user(&ctx, id)
            .inspect_err(log_rejection("remove_user", caller))?;

        info!(user_id = id, "[custody] User removed");
        self.publisher.publish(CustodyEvent::UserRemoved {
            user_id: id,
            timestamp: now,
        });
        Ok(())
    }

    fn set_user_state(
        &self,
        caller: Address,
        id: UserId,
        active: bool,
    ) -> Result<(), CustodyError> {
        let now = self.clock.now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        let ctx = CallContext::new(caller, &state.access, now);

        state
            .users
            .set_user_state(&ctx, id, active)
            .inspect_err(log_rejection("set_user_state", caller))?;

        info!(user_id = id, active, "[custody] User state changed");
        self.publisher.publish(CustodyEvent::UserStateChanged {
            user_id: id,
            active,
            timestamp: now,
        });
        Ok(())
    }

    fn login(&self, caller: Address, id: UserId) -> Result<Timestamp, CustodyError> {
        let now = self.clock.now();
        // Write lock so the login event is ordered with other mutations.
        let state = self.state.write();
        let ctx = CallContext::new(caller, &state.access, now);

        let timestamp = state
            .users
            .login(&ctx, id)
            .inspect_err(log_rejection("login", caller))?;

        info!(user_id = id, "[custody] User login");
        self.publisher.publish(CustodyEvent::UserLogin {
            user_id: id,
            timestamp,
        });
        Ok(timestamp)
    }

    fn all_users(&self) -> Vec<Address> {
        let users = self.state.read().users.all_users();
        debug!(count = users.len(), "[custody] Listed users");
        users
    }

    fn user_count(&self) -> usize {
        self.state.read().users.user_count()
    }
}
