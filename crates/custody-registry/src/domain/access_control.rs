//! # Access Control
//!
//! One admin identity plus a set of authorized identities, owned by every
//! contract instance. Registries never consult ambient state: the caller and
//! the governing [`AccessControl`] reach them through a [`CallContext`].

use super::errors::CustodyError;
use super::value_objects::Role;
use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, Timestamp};
use std::collections::HashSet;

/// Admin role plus authorized set of one contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    admin: Address,
    authorized: HashSet<Address>,
}

impl AccessControl {
    /// Create an access control whose admin is `admin` and whose authorized
    /// set is empty.
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            authorized: HashSet::new(),
        }
    }

    /// Create an access control with a pre-populated authorized set.
    /// Zero addresses are skipped.
    #[must_use]
    pub fn with_authorized(admin: Address, authorized: impl IntoIterator<Item = Address>) -> Self {
        Self {
            admin,
            authorized: authorized.into_iter().filter(|a| !a.is_zero()).collect(),
        }
    }

    /// Current admin.
    #[must_use]
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// True if `id` holds the admin role.
    #[must_use]
    pub fn is_admin(&self, id: &Address) -> bool {
        !id.is_zero() && *id == self.admin
    }

    /// True if `id` is the admin or a member of the authorized set.
    #[must_use]
    pub fn is_authorized(&self, id: &Address) -> bool {
        self.is_admin(id) || self.authorized.contains(id)
    }

    /// Members of the authorized set, sorted.
    #[must_use]
    pub fn authorized_users(&self) -> Vec<Address> {
        let mut users: Vec<_> = self.authorized.iter().copied().collect();
        users.sort();
        users
    }

    /// Fail unless `caller` is the admin.
    pub fn require_admin(&self, caller: &Address) -> Result<(), CustodyError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(CustodyError::unauthorized(*caller, Role::Admin))
        }
    }

    /// Fail unless `caller` is the admin or authorized.
    pub fn require_authorized(&self, caller: &Address) -> Result<(), CustodyError> {
        if self.is_authorized(caller) {
            Ok(())
        } else {
            Err(CustodyError::unauthorized(*caller, Role::Authorized))
        }
    }

    /// Hand the admin role to `new_admin`. Returns the previous admin.
    pub fn set_admin(
        &mut self,
        caller: &Address,
        new_admin: Address,
    ) -> Result<Address, CustodyError> {
        self.require_admin(caller)?;
        if new_admin.is_zero() {
            return Err(CustodyError::InvalidIdentity { field: "new_admin" });
        }
        Ok(std::mem::replace(&mut self.admin, new_admin))
    }

    /// Add `id` to the authorized set. Returns whether membership changed.
    pub fn add_authorized_user(
        &mut self,
        caller: &Address,
        id: Address,
    ) -> Result<bool, CustodyError> {
        self.require_admin(caller)?;
        if id.is_zero() {
            return Err(CustodyError::InvalidIdentity { field: "user" });
        }
        Ok(self.authorized.insert(id))
    }

    /// Remove `id` from the authorized set. Returns whether membership changed.
    pub fn remove_authorized_user(
        &mut self,
        caller: &Address,
        id: Address,
    ) -> Result<bool, CustodyError> {
        self.require_admin(caller)?;
        if id.is_zero() {
            return Err(CustodyError::InvalidIdentity { field: "user" });
        }
        Ok(self.authorized.remove(&id))
    }
}

/// Who is calling, under which access control, and when.
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    /// Identity making the call.
    pub caller: Address,
    /// Access control of the contract instance being called.
    pub access: &'a AccessControl,
    /// Execution time of the call.
    pub now: Timestamp,
}

impl<'a> CallContext<'a> {
    /// Create a call context.
    #[must_use]
    pub fn new(caller: Address, access: &'a AccessControl, now: Timestamp) -> Self {
        Self {
            caller,
            access,
            now,
        }
    }

    /// Fail unless the caller is the admin.
    pub fn require_admin(&self) -> Result<(), CustodyError> {
        self.access.require_admin(&self.caller)
    }

    /// Fail unless the caller is the admin or authorized.
    pub fn require_authorized(&self) -> Result<(), CustodyError> {
        self.access.require_authorized(&self.caller)
    }

    /// True if the caller is the admin.
    #[must_use]
    pub fn caller_is_admin(&self) -> bool {
        self.access.is_admin(&self.caller)
    }
}
