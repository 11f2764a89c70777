//! # Privy-Trade Node Runtime
//!
//! The main entry point for the confidential trade-settlement engine.
//!
//! ## Settlement Flow
//!
//! ```text
//! Caller ──CallEnvelope──→ VisibilityGate(6) ──→ Trade(3) ──→ PrivateState(2)
//!                                                    │
//!                                        DeliveryConfirmed{key}
//!                                                    ↓
//!                                               Event Bus
//!                                                    │
//!                                                    ↓
//!                           SettlementWorker ──→ SettlementBridge(5) ──→ Escrow(4)
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults + `PT_*` environment)
//! 2. Refuse a mainnet run with the development agent key
//! 3. Initialize subsystems leaf-first
//! 4. Start the settlement worker
//! 5. Run the demonstration scenario and print its public results
//! 6. Shut the worker down

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::container::{NodeConfig, RunMode, SubsystemContainer};
use node_runtime::scenario::{Cast, Scenario};

/// The runtime orchestrating all subsystems.
pub struct NodeRuntime {
    /// Subsystem container with all initialized services.
    container: Arc<SubsystemContainer>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
    /// Running settlement worker.
    worker: Option<JoinHandle<()>>,
}

impl NodeRuntime {
    /// Create a new runtime with configuration.
    pub fn new(config: NodeConfig) -> Self {
        info!("Creating Privy-Trade runtime");

        let container = Arc::new(SubsystemContainer::new(config));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            container,
            shutdown_tx,
            shutdown_rx,
            worker: None,
        }
    }

    /// Start the background handlers.
    pub fn start(&mut self) {
        info!("===========================================");
        info!("  Privy-Trade Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let worker = self.container.settlement_worker();
        let shutdown = self.shutdown_rx.clone();
        self.worker = Some(tokio::spawn(worker.run(shutdown)));

        info!(
            agent = %self.container.agent(),
            private_tx = self.container.config.gate.private_tx_enabled,
            "Settlement worker started"
        );
    }

    /// Shutdown gracefully.
    ///
    /// ## Shutdown Sequence
    ///
    /// 1. Signal shutdown to all handlers
    /// 2. Wait for the worker to exit (with timeout)
    pub async fn shutdown(mut self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        if let Some(worker) = self.worker.take() {
            match tokio::time::timeout(Duration::from_secs(2), worker).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Settlement worker panicked: {}", e),
                Err(_) => warn!("Settlement worker did not stop in time"),
            }
        }

        info!("Shutdown complete");
    }

    /// Get a reference to the subsystem container.
    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }
}

/// Load configuration from the environment.
fn load_config() -> Result<NodeConfig> {
    let config = NodeConfig::from_env().context("Invalid PT_* configuration")?;
    info!(mode = ?config.run_mode, "Configuration loaded");

    if config.run_mode == RunMode::Mainnet {
        config
            .validate_for_production()
            .context("Refusing to start")?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config()?;

    let mut runtime = NodeRuntime::new(config);
    runtime.start();

    let container = runtime.container();
    let cast = Cast::demo(container.agent().clone());
    let outcome = Scenario::new(container, cast).run().await;

    runtime.shutdown().await;

    let reports = outcome.context("Scenario failed")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&reports).context("Failed to encode report")?
    );

    Ok(())
}
