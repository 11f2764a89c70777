//! # Subsystem Container
//!
//! Central container holding all engine subsystem instances with proper
//! lifetime management and dependency injection.
//!
//! - Subsystems are constructed leaf-first (membership → gate)
//! - Configuration is passed to constructors; nothing is global
//! - Settlement reacts to the event bus, never to a direct call from the gate

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig, RunMode, DEV_AGENT_KEY};
pub use subsystems::SubsystemContainer;
