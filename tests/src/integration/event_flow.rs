//! # Event Flow
//!
//! Committed state changes reach bus subscribers in commit order; rejected
//! calls publish nothing.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use custody_registry::{AccessControlApi, AccountsApi, CaseApi, CaseRegistryApi};
    use shared_bus::{CustodyEvent, EventFilter, EventPublisher, EventTopic, RegistryScope};
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_scenario_events_in_commit_order() {
        let net = TestNet::new();
        let mut sub = net.bus.subscribe(EventFilter::all());

        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        case.add_authorized_user(OWNER, INVESTIGATOR).unwrap();
        case.add_evidence_item(INVESTIGATOR, 1000, "Logs").unwrap();
        case.add_stage_details(INVESTIGATOR, 1000, 0, "note").unwrap();

        let events = sub.drain();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[0],
            CustodyEvent::CaseDeployed { case_id: 1, owner, .. } if owner == OWNER
        ));
        assert!(matches!(
            events[1],
            CustodyEvent::AuthorizationChanged {
                scope: RegistryScope::Case(1),
                authorized: true,
                ..
            }
        ));
        assert!(matches!(
            events[2],
            CustodyEvent::EvidenceItemAdded { case_id: 1, item_id: 1000, .. }
        ));
        assert!(matches!(
            events[3],
            CustodyEvent::StageDetailsUpdated {
                case_id: 1,
                item_id: 1000,
                stage_id: 0,
                ..
            }
        ));
        assert!(events.iter().all(|e| e.timestamp() == GENESIS_TIME));
    }

    #[tokio::test]
    async fn test_rejected_calls_publish_nothing() {
        let net = TestNet::new();
        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        let published = net.bus.events_published();

        let _ = case.add_evidence_item(STRANGER, 1, "x");
        let _ = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]);
        let _ = net.registry.enable_case(ADMIN, 1);
        let _ = net.accounts.add_user(STRANGER, STRANGER, "h");
        // Re-adding a member changes nothing
        case.add_authorized_user(OWNER, INVESTIGATOR).unwrap();
        case.add_authorized_user(OWNER, INVESTIGATOR).unwrap();

        assert_eq!(net.bus.events_published(), published + 1);
    }

    #[tokio::test]
    async fn test_case_filter_isolates_cases() {
        let net = TestNet::new();
        let mut only_two = net.bus.subscribe(EventFilter::for_cases(vec![2]));

        let one = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        let two = net.registry.deploy_case(ADMIN, 2, OWNER, vec![]).unwrap();
        one.add_evidence_item(OWNER, 1, "a").unwrap();
        two.add_evidence_item(OWNER, 1, "b").unwrap();
        net.accounts.add_user(ADMIN, INVESTIGATOR, "h").unwrap();

        let events = only_two.drain();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.case_id() == Some(2)));
    }

    #[tokio::test]
    async fn test_topic_filter_on_stream() {
        let net = TestNet::new();
        let mut stream = net
            .bus
            .event_stream(EventFilter::topics(vec![EventTopic::Accounts]));

        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        case.add_evidence_item(OWNER, 1, "a").unwrap();
        let id = net.accounts.add_user(ADMIN, INVESTIGATOR, "h").unwrap();
        net.accounts.login(INVESTIGATOR, id).unwrap();

        let first = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout waiting for event")
            .expect("stream ended");
        assert!(matches!(first, CustodyEvent::UserAdded { user_id: 0, .. }));

        let second = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout waiting for event")
            .expect("stream ended");
        assert!(matches!(second, CustodyEvent::UserLogin { user_id: 0, .. }));
    }

    #[tokio::test]
    async fn test_concurrent_writers_on_one_case() {
        let net = TestNet::new();
        let case = net.registry.deploy_case(ADMIN, 1, OWNER, vec![]).unwrap();
        let mut sub = net
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Evidence]));

        let mut handles = Vec::new();
        for worker in 0..4u64 {
            let case = case.clone();
            handles.push(tokio::spawn(async move {
                for n in 0..25u64 {
                    case.add_evidence_item(OWNER, worker * 100 + n, "item")
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(case.evidence_item_count(), 100);
        assert_eq!(sub.drain().len(), 100);
    }
}
