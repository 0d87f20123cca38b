//! # Case Flow
//!
//! Deploys cases through the registry and drives the returned handles:
//! authorization, evidence items, stage notes, activity and paging.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use custody_registry::{
        AccessControlApi, CaseApi, CaseRegistryApi, CustodyError, Entity, NoteMode, NoteOutcome,
        RegistryConfig,
    };
    use proptest::prelude::*;
    use shared_types::entities::Address;

    // =========================================================================
    // CHAIN OF CUSTODY SCENARIO
    // =========================================================================

    #[test]
    fn test_chain_of_custody_scenario() {
        let net = TestNet::new();

        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        let record = net.registry.case_record(1).unwrap();
        assert!(record.active);
        assert!(!record.case_address.is_zero());
        assert_eq!(record.case_address, case.case_address());
        assert_eq!(record.owner, OWNER);

        case.add_authorized_user(OWNER, INVESTIGATOR).unwrap();
        case.add_evidence_item(INVESTIGATOR, 1000, "Logs").unwrap();
        case.add_stage_details(INVESTIGATOR, 1000, 0, "note").unwrap();

        let details = case.stage_details(1000, 0).unwrap();
        assert_eq!(details.stage_name, "Identification");
        assert_eq!(details.note.as_deref(), Some("note"));
        assert_eq!(details.updated_at, Some(GENESIS_TIME));

        assert_eq!(
            case.add_stage_details(INVESTIGATOR, 1000, 0, "again"),
            Err(CustodyError::AlreadySet { item: 1000, stage: 0 })
        );
        assert_eq!(
            case.stage_details(1000, 0).unwrap().note.as_deref(),
            Some("note")
        );
    }

    #[test]
    fn test_duplicate_deploy_rejected() {
        let net = TestNet::new();
        net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();

        let err = net
            .registry
            .deploy_case(ADMIN, 1, INVESTIGATOR, vec![])
            .err();
        assert_eq!(err, Some(CustodyError::DuplicateId(Entity::Case(1))));
        assert_eq!(net.registry.case_count(), 1);
        assert_eq!(net.registry.case_record(1).unwrap().owner, OWNER);
    }

    #[test]
    fn test_deployer_can_work_in_case() {
        let net = TestNet::new();
        let case = net.registry.deploy_case(ADMIN, 3, OWNER, vec![]).unwrap();

        assert!(case.is_authorized(&ADMIN));
        assert_eq!(case.admin(), OWNER);
        case.add_evidence_item(ADMIN, 1, "Laptop").unwrap();

        // Authorized, not admin: the catalog stays with the owner
        assert!(case
            .add_new_stage(ADMIN, "Courtroom")
            .unwrap_err()
            .is_authorization_failure());
    }

    #[test]
    fn test_deployer_not_authorized_when_disabled() {
        let config = RegistryConfig {
            authorize_deployer: false,
            ..RegistryConfig::default()
        };
        let net = TestNet::with_config(config);
        let case = net.registry.deploy_case(ADMIN, 3, OWNER, vec![]).unwrap();

        assert!(!case.is_authorized(&ADMIN));
        assert!(case.authorized_users().is_empty());
    }

    // =========================================================================
    // EVIDENCE & STAGE NOTES
    // =========================================================================

    #[test]
    fn test_duplicate_evidence_keeps_original() {
        let net = TestNet::new();
        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();

        case.add_evidence_item(OWNER, 7, "Phone").unwrap();
        assert_eq!(
            case.add_evidence_item(OWNER, 7, "Tablet"),
            Err(CustodyError::DuplicateId(Entity::EvidenceItem(7)))
        );
        assert_eq!(case.evidence_item(7).unwrap().name, "Phone");
        assert_eq!(case.evidence_item_count(), 1);
    }

    #[test]
    fn test_upsert_replaces_note_and_time() {
        let net = TestNet::new();
        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        case.add_evidence_item(OWNER, 1, "Drive").unwrap();

        assert_eq!(
            case.record_stage_details(OWNER, 1, 2, "imaged", NoteMode::Upsert),
            Ok(NoteOutcome::Created)
        );
        net.clock.advance(60);
        assert_eq!(
            case.record_stage_details(OWNER, 1, 2, "re-imaged", NoteMode::Upsert),
            Ok(NoteOutcome::Replaced)
        );

        assert_eq!(case.stage_update_time(1, 2), Ok(GENESIS_TIME + 60));
        assert_eq!(
            case.stage_details(1, 2).unwrap().note.as_deref(),
            Some("re-imaged")
        );
        assert_eq!(case.stage_count(1), Ok(1));
    }

    #[test]
    fn test_note_errors_are_ordered() {
        let net = TestNet::new();
        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        case.add_evidence_item(OWNER, 1, "Drive").unwrap();

        // Authorization is checked before existence
        assert!(case
            .update_stage_details(STRANGER, 99, 99, "x")
            .unwrap_err()
            .is_authorization_failure());
        assert_eq!(
            case.update_stage_details(OWNER, 99, 99, "x"),
            Err(CustodyError::NotFound(Entity::EvidenceItem(99)))
        );
        assert_eq!(
            case.update_stage_details(OWNER, 1, 99, "x"),
            Err(CustodyError::NotFound(Entity::Stage(99)))
        );
        assert_eq!(
            case.stage_update_time(1, 0),
            Err(CustodyError::NotFound(Entity::StageNote { item: 1, stage: 0 }))
        );
    }

    #[test]
    fn test_item_details_cover_every_stage() {
        let net = TestNet::new();
        let case = net
            .registry
            .deploy_case(
                ADMIN,
                1,
                OWNER,
                vec!["Seizure".to_string(), "Lab".to_string()],
            )
            .unwrap();
        case.add_evidence_item(OWNER, 5, "USB stick").unwrap();
        case.add_stage_details(OWNER, 5, 1, "hashed").unwrap();

        let stage = case.add_new_stage(OWNER, "Court").unwrap();
        assert_eq!(stage, 2);

        let details = case.evidence_item_details(5).unwrap();
        assert_eq!(details.name, "USB stick");
        assert_eq!(details.stage_count, 1);
        assert_eq!(details.stages.len(), 3);
        assert_eq!(details.stages[0].note, None);
        assert_eq!(details.stages[1].note.as_deref(), Some("hashed"));
        assert_eq!(details.stages[2].stage_name, "Court");
    }

    #[test]
    fn test_case_stages_follow_factory_default() {
        let net = TestNet::new();
        let custom = vec!["Intake".to_string(), "Review".to_string()];

        let first = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        net.registry.set_case_stages(ADMIN, custom.clone()).unwrap();
        let second = net.registry.deploy_case(ADMIN, 2, OWNER, vec![]).unwrap();

        assert_eq!(first.stage_names().len(), 7);
        assert_eq!(second.stage_names(), custom);
        assert_eq!(net.registry.case_stages(), custom);
    }

    // =========================================================================
    // ACTIVITY, ACCESS & PAGING
    // =========================================================================

    #[test]
    fn test_disable_enable_cycle() {
        let net = TestNet::new();
        net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();

        net.registry.disable_case(ADMIN, 1).unwrap();
        assert_eq!(net.registry.case_status(1), Ok(false));
        assert_eq!(
            net.registry.disable_case(ADMIN, 1),
            Err(CustodyError::AlreadyInactive(1))
        );

        net.registry.enable_case(ADMIN, 1).unwrap();
        assert_eq!(net.registry.case_status(1), Ok(true));
        assert_eq!(
            net.registry.enable_case(ADMIN, 1),
            Err(CustodyError::AlreadyActive(1))
        );
        assert_eq!(
            net.registry.enable_case(ADMIN, 9),
            Err(CustodyError::NotFound(Entity::Case(9)))
        );
    }

    #[test]
    fn test_disabled_case_handle_still_works() {
        let net = TestNet::new();
        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        net.registry.disable_case(ADMIN, 1).unwrap();

        case.add_evidence_item(OWNER, 1, "Camera").unwrap();
        assert_eq!(net.registry.case(1).unwrap().evidence_item_count(), 1);
    }

    #[test]
    fn test_access_log() {
        let net = TestNet::new();
        net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();

        assert_eq!(net.registry.record_access(STRANGER, 1), Ok(GENESIS_TIME));
        net.clock.advance(5);
        assert_eq!(
            net.registry.record_access(STRANGER, 1),
            Ok(GENESIS_TIME + 5)
        );
        net.registry.record_access(OWNER, 1).unwrap();

        let records = net.registry.access_records(1).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            net.registry.access_record(1, &STRANGER).unwrap().accessed_at,
            GENESIS_TIME + 5
        );
        assert_eq!(
            net.registry.record_access(Address::ZERO, 1),
            Err(CustodyError::InvalidIdentity { field: "caller" })
        );
    }

    #[test]
    fn test_paging_cases_and_items() {
        let net = TestNet::new();
        for id in 10..15 {
            net.registry.deploy_case(ADMIN, id, OWNER, vec![]).unwrap();
        }
        let case = net.registry.case(12).unwrap();
        for id in 0..4 {
            case.add_evidence_item(OWNER, id, &format!("item-{id}")).unwrap();
        }

        let page = net.registry.cases_in_range(3, 100).unwrap();
        assert_eq!(page.case_ids, vec![13, 14]);
        assert_eq!(page.len(), 2);

        let items = case.evidence_items_in_range(1, 3).unwrap();
        assert_eq!(items.ids, vec![1, 2]);
        assert_eq!(items.names, vec!["item-1".to_string(), "item-2".to_string()]);

        assert!(case.evidence_items_in_range(4, 4).unwrap().is_empty());
        assert_eq!(
            case.evidence_items_in_range(5, 9),
            Err(CustodyError::OutOfBounds { start: 5, len: 4 })
        );
        assert_eq!(
            net.registry.cases_in_range(9, 2),
            Err(CustodyError::InvalidRange { start: 9, end: 2 })
        );
    }

    // =========================================================================
    // UNAUTHORIZED CALLERS
    // =========================================================================

    #[test]
    fn test_stranger_cannot_mutate_case() {
        let net = TestNet::new();
        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        case.add_evidence_item(OWNER, 1, "Drive").unwrap();
        let before = case.evidence_item_details(1).unwrap();
        let stages_before = case.stage_names();

        for result in [
            case.add_evidence_item(STRANGER, 2, "x"),
            case.update_evidence_item(STRANGER, 1, "x"),
            case.add_stage_details(STRANGER, 1, 0, "x"),
            case.update_stage_details(STRANGER, 1, 0, "x"),
            case.add_new_stage(STRANGER, "x").map(|_| ()),
            case.update_stage_name(STRANGER, 0, "x"),
            case.add_authorized_user(STRANGER, STRANGER),
            case.set_admin(STRANGER, STRANGER),
        ] {
            assert!(result.unwrap_err().is_authorization_failure());
        }

        assert_eq!(case.evidence_item_details(1).unwrap(), before);
        assert_eq!(case.stage_names(), stages_before);
        assert_eq!(case.evidence_item_count(), 1);
        assert_eq!(case.admin(), OWNER);
    }

    #[test]
    fn test_revoked_investigator_loses_access() {
        let net = TestNet::new();
        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        case.add_authorized_user(OWNER, INVESTIGATOR).unwrap();
        case.add_evidence_item(INVESTIGATOR, 1, "Drive").unwrap();

        case.remove_authorized_user(OWNER, INVESTIGATOR).unwrap();
        assert!(case
            .add_stage_details(INVESTIGATOR, 1, 0, "x")
            .unwrap_err()
            .is_authorization_failure());
        assert_eq!(case.stage_count(1), Ok(0));
    }

    proptest! {
        #[test]
        fn test_unknown_callers_never_mutate(bytes in any::<[u8; 20]>(), id in any::<u64>()) {
            let caller = Address::new(bytes);
            prop_assume!(caller != ADMIN && caller != OWNER);

            let net = TestNet::new();
            let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();

            prop_assert!(net
                .registry
                .deploy_case(caller, id, caller, vec![])
                .err()
                .is_some_and(|e| e.is_authorization_failure()));
            prop_assert!(case
                .add_evidence_item(caller, id, "x")
                .unwrap_err()
                .is_authorization_failure());

            prop_assert_eq!(net.registry.case_count(), 1);
            prop_assert_eq!(case.evidence_item_count(), 0);
        }
    }
}
