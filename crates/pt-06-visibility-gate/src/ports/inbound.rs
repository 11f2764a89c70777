//! # Inbound Ports

use crate::domain::{CallResponse, ContractCall, GateError};
use async_trait::async_trait;
use shared_types::envelope::CallEnvelope;

/// Visibility gate API - inbound port.
///
/// The only entry point callers use; every other subsystem sits behind it.
#[async_trait]
pub trait VisibilityGateApi: Send + Sync {
    /// Classify, authorize, commit and apply one call.
    async fn execute(&self, call: CallEnvelope<ContractCall>) -> Result<CallResponse, GateError>;
}
