//! # Service Container
//!
//! Configuration plus dependency injection for the registries.

pub mod config;
pub mod services;

pub use config::{ConfigError, GenesisCaseConfig, NodeConfig};
pub use services::ServiceContainer;
