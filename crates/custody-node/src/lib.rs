//! # Custody Node Runtime
//!
//! Hosts the custody registries in one process.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and service wiring
//! - `genesis` - Startup case deployment
//! - `handlers/` - Event bus consumers
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, file, environment)
//! 2. Initialize the event bus and the registries
//! 3. Start the event logger
//! 4. Deploy the genesis case (if configured)
//! 5. Run until Ctrl+C

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod container;
pub mod genesis;
pub mod handlers;

use anyhow::{Context, Result};
use shared_bus::EventFilter;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::container::{NodeConfig, ServiceContainer};
use crate::genesis::deploy_genesis_case;
use crate::handlers::run_event_logger;

/// The node runtime owning every service.
pub struct NodeRuntime {
    /// Service container with all initialized registries.
    container: ServiceContainer,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Event logger task, once started.
    logger: Option<JoinHandle<u64>>,
}

impl NodeRuntime {
    /// Create a node runtime from configuration.
    pub fn new(config: NodeConfig) -> Result<Self> {
        let container = ServiceContainer::new(config).context("Failed to initialize services")?;
        Ok(Self::from_container(container))
    }

    /// Create a node runtime around an existing container.
    pub fn from_container(container: ServiceContainer) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            container,
            shutdown_tx,
            logger: None,
        }
    }

    /// Services of this node.
    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    /// Start the event logger and deploy the genesis case.
    pub async fn start(&mut self) -> Result<()> {
        info!("===========================================");
        info!("  Custody Node v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let stream = self.container.bus.event_stream(EventFilter::all());
        self.logger = Some(tokio::spawn(run_event_logger(
            stream,
            self.shutdown_tx.subscribe(),
        )));

        if let Some(genesis) = &self.container.config.genesis {
            deploy_genesis_case(&self.container.registry, self.container.config.admin, genesis)
                .context("Failed to deploy genesis case")?;
        }

        info!(admin = %self.container.config.admin, "[custody] Node started");
        Ok(())
    }

    /// Stop the event logger. Returns the number of events it logged.
    pub async fn shutdown(mut self) -> u64 {
        info!("[custody] Shutting down");
        // Receivers may already be gone; nothing to signal then.
        let _ = self.shutdown_tx.send(true);

        match self.logger.take() {
            Some(handle) => handle.await.unwrap_or_else(|e| {
                warn!(error = %e, "[custody] Event logger task failed");
                0
            }),
            None => 0,
        }
    }
}
