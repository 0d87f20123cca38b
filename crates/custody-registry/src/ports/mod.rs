//! # Ports Layer
//!
//! Inbound: the APIs callers use. Outbound: the clock and the event bus.

pub mod inbound;
pub mod outbound;

pub use inbound::{AccessControlApi, AccountsApi, CaseApi, CaseRegistryApi};
pub use outbound::{EventPublisher, SystemTimeSource, TimeSource};
