//! # Contract Calls
//!
//! Typed vocabulary of every call the engine accepts: the two deployments,
//! the escrow ABI and the trading-contract ABI.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::entities::{Address, Amount, Hash, Participant, TradeId};
use std::fmt;

/// Which part of the engine a call targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// Contract deployment.
    Deploy,
    /// Public escrow contract.
    Escrow,
    /// Private trading contract.
    Trading,
}

/// A single contract call.
///
/// `Debug` prints the operation name only, so a call can never leak its
/// arguments through a log line.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractCall {
    /// Deploy a trading contract privately to `participants`.
    DeployTradingContract {
        /// Privacy group members, deployer and settling agent included.
        participants: Vec<Participant>,
    },
    /// Deploy a public escrow owned by the caller.
    DeployEscrow,

    /// `prepay()` with a value.
    Prepay {
        /// Escrow contract.
        escrow: Address,
        /// Deposited value.
        amount: Amount,
    },
    /// `payTo(to, value)`.
    PayTo {
        /// Escrow contract.
        escrow: Address,
        /// Payout target.
        to: Address,
        /// Paid value.
        amount: Amount,
    },
    /// `getBalance()`.
    GetBalance {
        /// Escrow contract.
        escrow: Address,
    },
    /// Total paid from an escrow to one target.
    Credited {
        /// Escrow contract.
        escrow: Address,
        /// Payout target.
        to: Address,
    },

    /// `setItem(price, name, description)`.
    SetItem {
        /// Trading contract.
        contract: TradeId,
        /// Price in the smallest currency unit.
        price: Amount,
        /// Item name.
        name: String,
        /// Item description.
        description: String,
    },
    /// `updateItemPrice(price)`.
    UpdateItemPrice {
        /// Trading contract.
        contract: TradeId,
        /// New price.
        price: Amount,
    },
    /// `buy(pubkey)`.
    Buy {
        /// Trading contract.
        contract: TradeId,
        /// Buyer public key for the content key.
        buyer_pub_key: String,
    },
    /// `deliver(cid, symKey)`.
    Deliver {
        /// Trading contract.
        contract: TradeId,
        /// Content identifier.
        content_id: String,
        /// Symmetric key encrypted to the buyer.
        symmetric_key_encrypted: String,
    },
    /// `confirm()`.
    Confirm {
        /// Trading contract.
        contract: TradeId,
    },
    /// Seller withdraws an unsold listing.
    Withdraw {
        /// Trading contract.
        contract: TradeId,
    },
    /// `getItem()`.
    GetItem {
        /// Trading contract.
        contract: TradeId,
    },
    /// `getItemName()`.
    GetItemName {
        /// Trading contract.
        contract: TradeId,
    },
    /// `getItemPrice()`.
    GetItemPrice {
        /// Trading contract.
        contract: TradeId,
    },
    /// `_order()`.
    Order {
        /// Trading contract.
        contract: TradeId,
    },
    /// `_delivery()`.
    Delivery {
        /// Trading contract.
        contract: TradeId,
    },
    /// Lifecycle state and settlement progress.
    Status {
        /// Trading contract.
        contract: TradeId,
    },
    /// Private event log.
    Events {
        /// Trading contract.
        contract: TradeId,
    },
}

impl ContractCall {
    /// ABI-style operation name, safe to log.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeployTradingContract { .. } => "deployTradingContract",
            Self::DeployEscrow => "deployEscrow",
            Self::Prepay { .. } => "prepay",
            Self::PayTo { .. } => "payTo",
            Self::GetBalance { .. } => "getBalance",
            Self::Credited { .. } => "credited",
            Self::SetItem { .. } => "setItem",
            Self::UpdateItemPrice { .. } => "updateItemPrice",
            Self::Buy { .. } => "buy",
            Self::Deliver { .. } => "deliver",
            Self::Confirm { .. } => "confirm",
            Self::Withdraw { .. } => "withdraw",
            Self::GetItem { .. } => "getItem",
            Self::GetItemName { .. } => "getItemName",
            Self::GetItemPrice { .. } => "getItemPrice",
            Self::Order { .. } => "_order",
            Self::Delivery { .. } => "_delivery",
            Self::Status { .. } => "status",
            Self::Events { .. } => "events",
        }
    }

    /// Target of the call.
    #[must_use]
    pub fn kind(&self) -> CallKind {
        match self {
            Self::DeployTradingContract { .. } | Self::DeployEscrow => CallKind::Deploy,
            Self::Prepay { .. }
            | Self::PayTo { .. }
            | Self::GetBalance { .. }
            | Self::Credited { .. } => CallKind::Escrow,
            _ => CallKind::Trading,
        }
    }

    /// Read-only calls are evaluated locally and never reach the ledger.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::GetBalance { .. }
                | Self::Credited { .. }
                | Self::GetItem { .. }
                | Self::GetItemName { .. }
                | Self::GetItemPrice { .. }
                | Self::Order { .. }
                | Self::Delivery { .. }
                | Self::Status { .. }
                | Self::Events { .. }
        )
    }

    /// Trading contract addressed by the call, if any.
    #[must_use]
    pub fn contract(&self) -> Option<TradeId> {
        match self {
            Self::SetItem { contract, .. }
            | Self::UpdateItemPrice { contract, .. }
            | Self::Buy { contract, .. }
            | Self::Deliver { contract, .. }
            | Self::Confirm { contract }
            | Self::Withdraw { contract }
            | Self::GetItem { contract }
            | Self::GetItemName { contract }
            | Self::GetItemPrice { contract }
            | Self::Order { contract }
            | Self::Delivery { contract }
            | Self::Status { contract }
            | Self::Events { contract } => Some(*contract),
            _ => None,
        }
    }
}

impl fmt::Debug for ContractCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractCall({})", self.name())
    }
}

/// Digest a private call exposes to the ledger: `sha256(bincode(call))`.
pub fn private_digest(call: &ContractCall) -> Result<Hash, bincode::Error> {
    let encoded = bincode::serialize(call)?;
    Ok(Sha256::digest(&encoded).into())
}
