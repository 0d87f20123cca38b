//! # Application Layer
//!
//! Lock-guarded services that wrap the domain registries. Each call reads the
//! clock, takes the instance's write lock, runs the domain operation, and on
//! success logs and publishes the resulting event before releasing the lock.

pub mod accounts;
pub mod case;
pub mod factory;

pub use accounts::AccountsService;
pub use case::Case;
pub use factory::CaseRegistryService;

use crate::domain::{AccessControl, CustodyError};
use shared_bus::{CustodyEvent, EventPublisher, RegistryScope};
use shared_types::entities::{Address, Timestamp};
use tracing::{info, warn};

/// Logs a rejected call. Used with `Result::inspect_err`.
pub(crate) fn log_rejection(operation: &'static str, caller: Address) -> impl FnOnce(&CustodyError) {
    move |err| warn!(operation, caller = %caller, error = %err, "[custody] Call rejected")
}

/// Admin hand-over shared by every contract instance.
pub(crate) fn change_admin(
    access: &mut AccessControl,
    scope: RegistryScope,
    caller: Address,
    new_admin: Address,
    now: Timestamp,
    publisher: &dyn EventPublisher,
) -> Result<(), CustodyError> {
    let previous = access
        .set_admin(&caller, new_admin)
        .inspect_err(log_rejection("set_admin", caller))?;

    info!(scope = ?scope, previous = %previous, admin = %new_admin, "[custody] Admin changed");
    publisher.publish(CustodyEvent::AdminChanged {
        scope,
        previous,
        admin: new_admin,
        timestamp: now,
    });
    Ok(())
}

/// Authorized-set change shared by every contract instance. Publishes only
/// when membership actually changed.
pub(crate) fn change_authorization(
    access: &mut AccessControl,
    scope: RegistryScope,
    caller: Address,
    id: Address,
    authorized: bool,
    now: Timestamp,
    publisher: &dyn EventPublisher,
) -> Result<(), CustodyError> {
    let changed = if authorized {
        access
            .add_authorized_user(&caller, id)
            .inspect_err(log_rejection("add_authorized_user", caller))?
    } else {
        access
            .remove_authorized_user(&caller, id)
            .inspect_err(log_rejection("remove_authorized_user", caller))?
    };

    if changed {
        info!(scope = ?scope, address = %id, authorized, "[custody] Authorization changed");
        publisher.publish(CustodyEvent::AuthorizationChanged {
            scope,
            address: id,
            authorized,
            timestamp: now,
        });
    }
    Ok(())
}
