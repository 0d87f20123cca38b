//! # Integration Flows
//!
//! Every test drives the public service APIs only, with a fixed clock and a
//! shared in-memory bus.

pub mod accounts_flow;
pub mod case_flow;
pub mod event_flow;
pub mod fixtures;
