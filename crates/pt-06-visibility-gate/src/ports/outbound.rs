//! # Outbound Ports
//!
//! Boundary to the ledger/consensus engine. The gate submits state-changing
//! calls and waits for their commit; it never interprets blocks.

use crate::domain::GateError;
use async_trait::async_trait;
use shared_types::entities::{Address, GroupId, Hash, ReceiptId};
use std::time::Duration;
use uuid::Uuid;

/// What the ledger sees of a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionScope {
    /// Public partition: the encoded call is visible to everyone.
    Public {
        /// Encoded call.
        payload: Vec<u8>,
    },
    /// Private partition: group id and payload digest only.
    Private {
        /// Privacy group.
        group: GroupId,
        /// `sha256(bincode(call))`.
        digest: Hash,
    },
}

/// A state-changing call handed to the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    /// Correlation id of the originating envelope.
    pub correlation_id: Uuid,
    /// Sender account.
    pub sender: Address,
    /// Visible part of the call.
    pub scope: SubmissionScope,
}

/// Ledger/consensus client.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a state-changing call; returns its opaque receipt id.
    async fn submit(&self, submission: Submission) -> Result<ReceiptId, GateError>;

    /// Block until `receipt` is committed, or fail after `timeout`.
    async fn wait_for_commit(&self, receipt: ReceiptId, timeout: Duration)
        -> Result<(), GateError>;
}
