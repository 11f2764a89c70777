//! In-memory ledger client: commits every submission immediately.

use crate::domain::GateError;
use crate::ports::{LedgerClient, Submission};
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use shared_types::entities::ReceiptId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// In-memory ledger for development and testing.
///
/// Every accepted submission is kept for the life of the process: `committed`
/// and `order` only grow, with nothing pruned or rolled back. Memory use is
/// proportional to the number of state-changing calls, so it is unsuitable
/// for a long-running node.
#[derive(Default)]
pub struct InMemoryLedger {
    committed: RwLock<HashMap<ReceiptId, Submission>>,
    order: RwLock<Vec<ReceiptId>>,
    sequence: AtomicU64,
    should_fail: bool,
    withhold_commits: bool,
}

impl InMemoryLedger {
    /// Ledger that accepts and commits everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger that refuses every submission.
    #[must_use]
    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Ledger that accepts submissions but never confirms a commit.
    #[must_use]
    pub fn withholding_commits() -> Self {
        Self {
            withhold_commits: true,
            ..Self::default()
        }
    }

    /// Submissions in commit order.
    pub fn submissions(&self) -> Vec<Submission> {
        let committed = self.committed.read();
        self.order
            .read()
            .iter()
            .filter_map(|receipt| committed.get(receipt).cloned())
            .collect()
    }

    /// Number of submissions.
    pub fn len(&self) -> usize {
        self.order.read().len()
    }

    /// Whether nothing was submitted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn submit(&self, submission: Submission) -> Result<ReceiptId, GateError> {
        if self.should_fail {
            return Err(GateError::Submission("ledger unavailable".to_string()));
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let mut hasher = Sha256::new();
        hasher.update(sequence.to_be_bytes());
        hasher.update(submission.correlation_id.as_bytes());
        hasher.update(submission.sender);
        let receipt = ReceiptId(hasher.finalize().into());

        debug!(%receipt, sequence, "[pt-06] ledger accepted submission");
        self.committed.write().insert(receipt, submission);
        self.order.write().push(receipt);
        Ok(receipt)
    }

    async fn wait_for_commit(
        &self,
        receipt: ReceiptId,
        timeout: Duration,
    ) -> Result<(), GateError> {
        if self.withhold_commits {
            tokio::time::sleep(timeout).await;
            return Err(GateError::CommitTimeout(receipt));
        }
        if self.committed.read().contains_key(&receipt) {
            Ok(())
        } else {
            Err(GateError::Submission(format!("unknown receipt {receipt}")))
        }
    }
}
