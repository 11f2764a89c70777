//! # Subsystem Container
//!
//! Holds all engine subsystem instances.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Event Bus, Group Membership (1), Escrow Ledger (4), Ledger client
//! Level 1: Private State Store (2)
//! Level 2: Trade Lifecycle (3)
//! Level 3: Settlement Bridge (5) paying through the ledger client,
//!          Visibility Gate (6)
//! ```

use std::sync::Arc;

use tracing::info;

use pt_01_group_membership::GroupRegistry;
use pt_02_private_state::{InMemoryPartitionBackend, PrivateStateStore};
use pt_03_trade_lifecycle::{Trade, TradeService};
use pt_04_escrow_ledger::EscrowLedger;
use pt_05_settlement_bridge::{
    EscrowPayoutAdapter, SettlementBridge, SettlementWorker, TradeSourceAdapter,
};
use pt_06_visibility_gate::{InMemoryLedger, VisibilityGate};
use shared_bus::InMemoryEventBus;
use shared_types::entities::Participant;

use crate::adapters::CommittedPayoutGateway;
use crate::container::config::NodeConfig;

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    /// Shared event bus.
    pub bus: Arc<InMemoryEventBus>,
    /// Group Membership (Subsystem 1).
    pub groups: Arc<GroupRegistry>,
    /// Private State Store (Subsystem 2).
    pub store: Arc<PrivateStateStore<Trade>>,
    /// Trade Lifecycle (Subsystem 3).
    pub trades: Arc<TradeService>,
    /// Escrow Ledger (Subsystem 4).
    pub escrows: Arc<EscrowLedger>,
    /// Settlement Bridge (Subsystem 5).
    pub bridge: Arc<SettlementBridge>,
    /// Ledger/consensus client used by the gate.
    pub ledger: Arc<InMemoryLedger>,
    /// Visibility Gate (Subsystem 6). The entry point for callers.
    pub gate: Arc<VisibilityGate>,
    /// Configuration the container was built from.
    pub config: NodeConfig,
}

impl SubsystemContainer {
    /// Build every subsystem from `config`.
    pub fn new(config: NodeConfig) -> Self {
        info!("Initializing engine subsystems...");
        let agent = config.agent.clone();

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus_capacity));
        let groups = Arc::new(GroupRegistry::new(config.group.clone()));
        let escrows = Arc::new(EscrowLedger::new(bus.clone()));
        let ledger = Arc::new(InMemoryLedger::new());
        info!("  [1] Group Membership initialized");
        info!("  [4] Escrow Ledger initialized");

        let store = Arc::new(PrivateStateStore::new(
            groups.clone(),
            Arc::new(InMemoryPartitionBackend::new()),
        ));
        info!("  [2] Private State Store initialized");

        let trades = Arc::new(TradeService::new(store.clone(), bus.clone(), agent.clone()));
        info!("  [3] Trade Lifecycle initialized");

        // Settlement payouts are committed like any caller's payTo.
        let payouts = CommittedPayoutGateway::new(
            ledger.clone(),
            EscrowPayoutAdapter::new(escrows.clone()),
            config.gate.commit_timeout(),
        );
        let bridge = Arc::new(SettlementBridge::new(
            Arc::new(TradeSourceAdapter::new(trades.clone())),
            Arc::new(payouts),
            bus.clone(),
            agent.clone(),
            config.settlement.clone(),
        ));
        info!(
            max_attempts = config.settlement.max_attempts,
            "  [5] Settlement Bridge initialized"
        );

        let gate = Arc::new(VisibilityGate::new(
            config.gate.clone(),
            agent,
            groups.clone(),
            trades.clone(),
            escrows.clone(),
            ledger.clone(),
            bus.clone(),
        ));
        info!(
            private_tx = config.gate.private_tx_enabled,
            "  [6] Visibility Gate initialized"
        );

        Self {
            bus,
            groups,
            store,
            trades,
            escrows,
            bridge,
            ledger,
            gate,
            config,
        }
    }

    /// Settling agent identity.
    pub fn agent(&self) -> &Participant {
        &self.config.agent
    }

    /// Worker subscribed to trade lifecycle events, ready to `run`.
    pub fn settlement_worker(&self) -> SettlementWorker {
        let subscription = self.bus.subscribe(SettlementWorker::filter());
        SettlementWorker::new(Arc::clone(&self.bridge), subscription)
    }
}
