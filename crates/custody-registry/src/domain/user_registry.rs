//! # User Registry
//!
//! Sequentially numbered user slots. Every mutation is admin-only; a removed
//! user keeps its id and reads back as a zeroed record.

use super::access_control::CallContext;
use super::entities::{User, UserSlot};
use super::errors::CustodyError;
use super::value_objects::{Entity, Role, UserStatus};
use shared_types::entities::{Address, Timestamp, UserId};

/// Id-indexed user slots.
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    slots: Vec<UserSlot>,
}

impl UserRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: UserId) -> Option<&UserSlot> {
        usize::try_from(id).ok().and_then(|i| self.slots.get(i))
    }

    fn live_user_mut(&mut self, id: UserId) -> Result<&mut User, CustodyError> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.slots.get_mut(i))
            .and_then(|slot| match slot {
                UserSlot::Registered(user) => Some(user),
                UserSlot::Removed => None,
            })
            .ok_or(CustodyError::NotFound(Entity::User(id)))
    }

    fn live_user(&self, id: UserId) -> Result<&User, CustodyError> {
        self.slot(id)
            .and_then(UserSlot::user)
            .ok_or(CustodyError::NotFound(Entity::User(id)))
    }

    /// Register a new user and return its id.
    pub fn add_user(
        &mut self,
        ctx: &CallContext<'_>,
        address: Address,
        password_hash: &str,
    ) -> Result<UserId, CustodyError> {
        ctx.require_admin()?;
        if address.is_zero() {
            return Err(CustodyError::InvalidIdentity { field: "address" });
        }
        if password_hash.is_empty() {
            return Err(CustodyError::EmptyCredential);
        }

        let id = self.slots.len() as UserId;
        self.slots.push(UserSlot::Registered(User {
            id,
            address,
            password_hash: password_hash.to_string(),
            active: true,
        }));
        Ok(id)
    }

    /// Read a user. A removed slot reads back zeroed.
    pub fn get_user(&self, id: UserId) -> Result<User, CustodyError> {
        match self.slot(id) {
            Some(UserSlot::Registered(user)) => Ok(user.clone()),
            Some(UserSlot::Removed) => Ok(User::removed(id)),
            None => Err(CustodyError::NotFound(Entity::User(id))),
        }
    }

    /// Lifecycle of an id slot.
    #[must_use]
    pub fn user_status(&self, id: UserId) -> UserStatus {
        match self.slot(id) {
            Some(UserSlot::Registered(_)) => UserStatus::Registered,
            Some(UserSlot::Removed) => UserStatus::Removed,
            None => UserStatus::Absent,
        }
    }

    /// Overwrite a user's credential and, optionally, its address.
    pub fn update_user(
        &mut self,
        ctx: &CallContext<'_>,
        id: UserId,
        new_address: Option<Address>,
        new_hash: &str,
    ) -> Result<(), CustodyError> {
        ctx.require_admin()?;
        self.live_user(id)?;
        if new_hash.is_empty() {
            return Err(CustodyError::EmptyCredential);
        }
        if new_address.is_some_and(|a| a.is_zero()) {
            return Err(CustodyError::InvalidIdentity { field: "address" });
        }

        let user = self.live_user_mut(id)?;
        if let Some(address) = new_address {
            user.address = address;
        }
        user.password_hash = new_hash.to_string();
        Ok(())
    }

    /// Soft-delete a user.
    pub fn remove_user(&mut self, ctx: &CallContext<'_>, id: UserId) -> Result<(), CustodyError> {
        ctx.require_admin()?;
        self.live_user(id)?;

        if let Some(slot) = usize::try_from(id).ok().and_then(|i| self.slots.get_mut(i)) {
            *slot = UserSlot::Removed;
        }
        Ok(())
    }

    /// Set a user's active flag. Setting the current value is allowed.
    pub fn set_user_state(
        &mut self,
        ctx: &CallContext<'_>,
        id: UserId,
        active: bool,
    ) -> Result<(), CustodyError> {
        ctx.require_admin()?;
        self.live_user_mut(id)?.active = active;
        Ok(())
    }

    /// Check that the caller may log in as `id` and return the login time.
    pub fn login(&self, ctx: &CallContext<'_>, id: UserId) -> Result<Timestamp, CustodyError> {
        let user = self.live_user(id)?;
        if ctx.caller != user.address && !ctx.caller_is_admin() {
            return Err(CustodyError::unauthorized(ctx.caller, Role::AccountHolder));
        }
        Ok(ctx.now)
    }

    /// Addresses of live users in id order.
    #[must_use]
    pub fn all_users(&self) -> Vec<Address> {
        self.slots
            .iter()
            .filter_map(UserSlot::user)
            .map(|u| u.address)
            .collect()
    }

    /// Number of assigned id slots, removed ones included.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.slots.len()
    }
}
