//! # Event Subscriber
//!
//! Defines the subscription side of the event bus.

use crate::events::{CustodyEvent, EventFilter, EventTopic};
use parking_lot::Mutex;
use shared_types::entities::CaseId;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was closed.
    #[error("Event bus closed")]
    Closed,
}

/// Trait for subscribing to events from the bus.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe to events matching a filter.
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

impl EventSubscriber for crate::publisher::InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        crate::publisher::InMemoryEventBus::subscribe(self, filter)
    }
}

/// Normalized form of a filter: topic and case lists sorted and deduplicated,
/// so filters that select the same events share one count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct FilterKey {
    topics: Vec<EventTopic>,
    case_ids: Vec<CaseId>,
}

impl From<&EventFilter> for FilterKey {
    fn from(filter: &EventFilter) -> Self {
        let mut topics = filter.topics.clone();
        topics.sort_unstable();
        topics.dedup();
        let mut case_ids = filter.case_ids.clone();
        case_ids.sort_unstable();
        case_ids.dedup();
        Self { topics, case_ids }
    }
}

/// Live subscriptions per filter, shared between the bus and its handles.
#[derive(Debug, Default)]
pub(crate) struct SubscriberTally {
    live: Mutex<HashMap<FilterKey, usize>>,
}

impl SubscriberTally {
    /// Count one more subscription under `key` and return its release guard.
    pub(crate) fn acquire(self: &Arc<Self>, key: FilterKey) -> SubscriptionGuard {
        *self.live.lock().entry(key.clone()).or_default() += 1;
        SubscriptionGuard {
            tally: Arc::clone(self),
            key,
        }
    }

    /// Live subscriptions under `key`.
    pub(crate) fn live(&self, key: &FilterKey) -> usize {
        self.live.lock().get(key).copied().unwrap_or(0)
    }

    fn release(&self, key: &FilterKey) {
        let mut live = self.live.lock();
        if let Some(count) = live.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                live.remove(key);
            }
        }
    }
}

/// Gives the subscription's slot back to the tally on drop.
pub(crate) struct SubscriptionGuard {
    tally: Arc<SubscriberTally>,
    key: FilterKey,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.tally.release(&self.key);
        debug!(topics = ?self.key.topics, cases = ?self.key.case_ids, "[bus] Subscription released");
    }
}

/// A subscription handle for receiving events.
///
/// When dropped, the subscription is automatically cleaned up.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<CustodyEvent>,

    /// Filter for this subscription.
    filter: EventFilter,

    guard: SubscriptionGuard,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(
        receiver: broadcast::Receiver<CustodyEvent>,
        filter: EventFilter,
        guard: SubscriptionGuard,
    ) -> Self {
        Self {
            receiver,
            filter,
            guard,
        }
    }

    /// Receive the next event that matches the filter.
    ///
    /// Returns `None` once the bus has been dropped.
    pub async fn recv(&mut self) -> Option<CustodyEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some events dropped");
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Try to receive the next event without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was available and matched
    /// - `Ok(None)` - No event available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<CustodyEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    /// Drain every matching event that is already buffered.
    pub fn drain(&mut self) -> Vec<CustodyEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct EventStream {
    inner: BroadcastStream<CustodyEvent>,
    filter: EventFilter,
    _guard: SubscriptionGuard,
}

impl EventStream {
    /// Create a new event stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        let Subscription {
            receiver,
            filter,
            guard,
        } = subscription;
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
            _guard: guard,
        }
    }

    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = CustodyEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match ready!(Pin::new(&mut self.inner).poll_next(cx)) {
                Some(Ok(event)) => {
                    if self.filter.matches(&event) {
                        return Poll::Ready(Some(event));
                    }
                }
                Some(Err(BroadcastStreamRecvError::Lagged(count))) => {
                    debug!(lagged = count, "Stream lagged, some events dropped");
                }
                None => return Poll::Ready(None),
            }
        }
    }
}
