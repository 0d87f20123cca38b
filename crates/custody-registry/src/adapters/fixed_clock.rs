//! Fixed Clock Adapter
//!
//! Implements `TimeSource` with a manually driven timestamp, for replays and
//! deterministic tests.

use crate::ports::outbound::TimeSource;
use shared_types::entities::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    time: AtomicU64,
}

impl FixedTimeSource {
    /// Create a clock reading `initial`.
    #[must_use]
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: AtomicU64::new(initial),
        }
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.time.fetch_add(secs, Ordering::SeqCst);
    }

    /// Set the clock to `time`.
    pub fn set(&self, time: Timestamp) {
        self.time.store(time, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(Ordering::SeqCst)
    }
}
