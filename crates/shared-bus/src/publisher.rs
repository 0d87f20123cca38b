//! # Event Publisher
//!
//! The publishing half of the bus and its in-memory implementation.

use crate::events::{CustodyEvent, EventFilter};
use crate::subscriber::{EventStream, FilterKey, SubscriberTally, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Sink for committed custody events.
///
/// Registries publish while still holding their own write lock, so the
/// order in which events appear on the bus is the order in which the
/// state transitions were committed. Publishing therefore never awaits.
pub trait EventPublisher: Send + Sync {
    /// Hand `event` to every live subscriber. Returns how many received it.
    fn publish(&self, event: CustodyEvent) -> usize;

    /// Events handed to `publish` so far, delivered or not.
    fn events_published(&self) -> u64;
}

/// Process-local bus over a `tokio::sync::broadcast` channel.
///
/// Every receiver gets every event; filters are applied on the receiving
/// side by [`Subscription`] and [`EventStream`].
pub struct InMemoryEventBus {
    sender: broadcast::Sender<CustodyEvent>,
    tally: Arc<SubscriberTally>,
    published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus buffering [`DEFAULT_CHANNEL_CAPACITY`] events per subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            tally: Arc::default(),
            published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Open a subscription. Events published before this call are not seen.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let guard = self.tally.acquire(FilterKey::from(&filter));
        debug!(topics = ?filter.topics, cases = ?filter.case_ids, "[bus] Subscription opened");
        Subscription::new(self.sender.subscribe(), filter, guard)
    }

    /// Open a subscription as a `Stream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Live receivers, whatever their filter.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Live subscriptions whose filter selects the same events as `filter`.
    #[must_use]
    pub fn subscriptions_for(&self, filter: &EventFilter) -> usize {
        self.tally.live(&FilterKey::from(filter))
    }

    /// Per-subscriber buffer size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for InMemoryEventBus {
    fn publish(&self, event: CustodyEvent) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        let (topic, case_id) = (event.topic(), event.case_id());

        // `send` only fails when nobody is listening
        let receivers = self.sender.send(event).unwrap_or(0);
        trace!(topic = ?topic, case_id = ?case_id, receivers, "[bus] Event published");
        receivers
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
