//! # Accounts Flow
//!
//! User lifecycle through the accounts registry: add, read, update, state
//! changes, soft removal and login.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use custody_registry::{AccessControlApi, AccountsApi, CustodyError, Entity, UserStatus};
    use shared_types::entities::Address;

    #[test]
    fn test_get_user_before_and_after_add() {
        let net = TestNet::new();
        let addr = Address::new([0x42; 20]);

        assert_eq!(
            net.accounts.get_user(0),
            Err(CustodyError::NotFound(Entity::User(0)))
        );

        let id = net.accounts.add_user(ADMIN, addr, "h").unwrap();
        assert_eq!(id, 0);

        let user = net.accounts.get_user(0).unwrap();
        assert_eq!(user.address, addr);
        assert_eq!(user.password_hash, "h");
        assert!(user.active);
    }

    #[test]
    fn test_user_lifecycle() {
        let net = TestNet::new();
        let first = Address::new([0x01; 20]);
        let second = Address::new([0x02; 20]);
        let moved = Address::new([0x03; 20]);

        let a = net.accounts.add_user(ADMIN, first, "hash-a").unwrap();
        let b = net.accounts.add_user(ADMIN, second, "hash-b").unwrap();
        assert_eq!((a, b), (0, 1));

        net.accounts
            .update_user(ADMIN, b, Some(moved), "hash-b2")
            .unwrap();
        net.accounts.set_user_state(ADMIN, a, false).unwrap();
        assert!(!net.accounts.get_user(a).unwrap().active);

        net.accounts.remove_user(ADMIN, a).unwrap();
        assert_eq!(net.accounts.user_status(a), UserStatus::Removed);
        assert_eq!(net.accounts.user_status(b), UserStatus::Registered);
        assert_eq!(net.accounts.user_status(7), UserStatus::Absent);

        // Removed slots keep their id and read back zeroed
        let removed = net.accounts.get_user(a).unwrap();
        assert!(removed.address.is_zero());
        assert!(removed.password_hash.is_empty());
        assert_eq!(net.accounts.user_count(), 2);
        assert_eq!(net.accounts.all_users(), vec![moved]);

        // A new user never reuses a removed id
        assert_eq!(net.accounts.add_user(ADMIN, first, "again").unwrap(), 2);
    }

    #[test]
    fn test_login_self_or_admin() {
        let net = TestNet::new();
        let holder = Address::new([0x77; 20]);
        let id = net.accounts.add_user(ADMIN, holder, "h").unwrap();

        assert_eq!(net.accounts.login(holder, id), Ok(GENESIS_TIME));
        net.clock.advance(30);
        assert_eq!(net.accounts.login(ADMIN, id), Ok(GENESIS_TIME + 30));

        let err = net.accounts.login(STRANGER, id).unwrap_err();
        assert!(err.is_authorization_failure());

        net.accounts.remove_user(ADMIN, id).unwrap();
        assert_eq!(
            net.accounts.login(holder, id),
            Err(CustodyError::NotFound(Entity::User(id)))
        );
    }

    #[test]
    fn test_non_admin_mutations_leave_users_unchanged() {
        let net = TestNet::new();
        let holder = Address::new([0x77; 20]);
        let id = net.accounts.add_user(ADMIN, holder, "h").unwrap();
        let before = net.accounts.get_user(id).unwrap();

        for result in [
            net.accounts
                .add_user(STRANGER, STRANGER, "x")
                .map(|_| ()),
            net.accounts.update_user(STRANGER, id, None, "x"),
            net.accounts.set_user_state(STRANGER, id, false),
            net.accounts.remove_user(STRANGER, id),
            net.accounts.set_admin(STRANGER, STRANGER),
        ] {
            assert!(result.unwrap_err().is_authorization_failure());
        }

        // The account holder is not the registry admin either
        assert!(net
            .accounts
            .update_user(holder, id, None, "self-service")
            .unwrap_err()
            .is_authorization_failure());

        assert_eq!(net.accounts.get_user(id).unwrap(), before);
        assert_eq!(net.accounts.user_count(), 1);
        assert_eq!(net.accounts.admin(), ADMIN);
    }

    #[test]
    fn test_admin_handover() {
        let net = TestNet::new();
        let successor = Address::new([0x99; 20]);

        net.accounts.set_admin(ADMIN, successor).unwrap();
        assert_eq!(net.accounts.admin(), successor);

        // The previous admin lost its rights
        assert!(net
            .accounts
            .add_user(ADMIN, STRANGER, "h")
            .unwrap_err()
            .is_authorization_failure());
        assert_eq!(net.accounts.add_user(successor, STRANGER, "h"), Ok(0));

        assert_eq!(
            net.accounts.set_admin(successor, Address::ZERO),
            Err(CustodyError::InvalidIdentity { field: "new_admin" })
        );
    }

    #[test]
    fn test_factory_admin_is_not_accounts_admin() {
        let net = TestNet::new();
        let successor = Address::new([0x99; 20]);
        net.accounts.set_admin(ADMIN, successor).unwrap();

        // Each registry keeps its own access control
        assert_eq!(net.registry.admin(), ADMIN);
    }
}
