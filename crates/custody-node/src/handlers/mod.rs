//! # Event Handlers
//!
//! Long-running tasks that consume the event bus.

pub mod event_logger;

pub use event_logger::{log_event, run_event_logger};
