//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **EDA (Event-Driven Architecture)**: settlement reacts to bus events only
//! - **DDD (Domain-Driven Design)**: each subsystem owns its domain logic
//! - **Hexagonal Architecture**: ports define contracts, adapters implement them

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod container;
pub mod scenario;

pub use container::{ConfigError, NodeConfig, RunMode, SubsystemContainer};
pub use scenario::{Cast, Scenario, SceneReport, ScenarioError};
