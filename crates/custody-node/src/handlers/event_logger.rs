//! # Event Logger
//!
//! Logs every committed state transition seen on the bus until shutdown.

use shared_bus::{CustodyEvent, EventStream};
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tracing::info;

/// Log one event with its identifying fields.
pub fn log_event(event: &CustodyEvent) {
    match event {
        CustodyEvent::AdminChanged { scope, admin, .. } => {
            info!(scope = ?scope, admin = %admin, "[custody] event: AdminChanged");
        }
        CustodyEvent::AuthorizationChanged {
            scope,
            address,
            authorized,
            ..
        } => {
            info!(scope = ?scope, address = %address, authorized, "[custody] event: AuthorizationChanged");
        }
        CustodyEvent::CaseDeployed {
            case_id,
            case_address,
            owner,
            ..
        } => {
            info!(case_id, case_address = %case_address, owner = %owner, "[custody] event: CaseDeployed");
        }
        CustodyEvent::CaseAccessed {
            case_id, accessor, ..
        } => {
            info!(case_id, accessor = %accessor, "[custody] event: CaseAccessed");
        }
        CustodyEvent::StageDetailsUpdated {
            case_id,
            item_id,
            stage_id,
            ..
        } => {
            info!(case_id, item_id, stage_id, "[custody] event: StageDetailsUpdated");
        }
        other => {
            info!(
                topic = ?other.topic(),
                case_id = ?other.case_id(),
                timestamp = other.timestamp(),
                "[custody] event: {:?}",
                other
            );
        }
    }
}

/// Consume `stream` until it ends or `shutdown` flips. Returns the number of
/// events logged.
pub async fn run_event_logger(mut stream: EventStream, mut shutdown: watch::Receiver<bool>) -> u64 {
    info!("[custody] Event logger started");
    let mut logged = 0u64;

    loop {
        tokio::select! {
            next = stream.next() => match next {
                Some(event) => {
                    log_event(&event);
                    logged += 1;
                }
                None => break,
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!(logged, "[custody] Event logger stopped");
    logged
}
