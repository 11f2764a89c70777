//! Cross-subsystem integration flows.

pub mod confidentiality;
pub mod e2e;
pub mod idempotence;
pub mod state_machine;
