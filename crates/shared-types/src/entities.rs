//! # Core Domain Entities
//!
//! Identities and identifiers shared by every subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `Participant`, `Address`
//! - **Scoping**: `GroupId`, `TradeId`, `PartitionKey`
//! - **Ledger**: `Amount`, `ReceiptId`

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

// =============================================================================
// PRIMITIVES
// =============================================================================

/// A 32-byte hash (SHA-256 or Keccak-256).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Value in the smallest currency unit (`uint256` on the ledger).
pub type Amount = U256;

/// The zero address. Never a valid payout target.
pub const ZERO_ADDRESS: Address = [0u8; 20];

// =============================================================================
// IDENTITY
// =============================================================================

/// A protocol participant, identified by its public key.
///
/// The key is opaque to the engine (the demo uses DER-encoded RSA keys);
/// equality is byte equality. The account address used by contracts is
/// derived from the key, see [`Participant::address`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Participant(Vec<u8>);

impl Participant {
    /// Create a participant from raw public key bytes.
    pub fn new(public_key: impl Into<Vec<u8>>) -> Self {
        Self(public_key.into())
    }

    /// Parse a hex-encoded public key, with or without `0x` prefix.
    pub fn from_hex(encoded: &str) -> Result<Self, hex::FromHexError> {
        let trimmed = encoded.strip_prefix("0x").unwrap_or(encoded);
        hex::decode(trimmed).map(Self)
    }

    /// Raw public key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.0
    }

    /// `0x`-prefixed hex encoding of the public key.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// Account address: last 20 bytes of `keccak256(public_key)`.
    pub fn address(&self) -> Address {
        let digest = Keccak256::digest(&self.0);
        let mut address = [0u8; 20];
        address.copy_from_slice(&digest[12..]);
        address
    }
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Participant({})", short_hex(&self.address()))
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_hex(&self.address()))
    }
}

// =============================================================================
// SCOPING
// =============================================================================

/// Deterministic fingerprint of a privacy group's membership set.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GroupId(pub Hash);

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", short_hex(&self.0))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_hex(&self.0))
    }
}

/// Identifier of a trade: the address of its trading contract.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TradeId(pub Address);

impl fmt::Debug for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TradeId({})", short_hex(&self.0))
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_hex(&self.0))
    }
}

/// Key of one private partition: a trade inside the group that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartitionKey {
    /// Owning privacy group.
    pub group: GroupId,
    /// Trade (trading contract) inside the group.
    pub trade: TradeId,
}

impl PartitionKey {
    /// Create a partition key.
    pub fn new(group: GroupId, trade: TradeId) -> Self {
        Self { group, trade }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.trade)
    }
}

// =============================================================================
// LEDGER
// =============================================================================

/// Opaque identifier returned by the ledger for a committed call.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptId(pub Hash);

impl fmt::Debug for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReceiptId({})", short_hex(&self.0))
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Derive a contract address from its deployer and deploy nonce
/// (last 20 bytes of `keccak256(deployer || nonce_be)`).
pub fn derive_contract_address(deployer: &Address, nonce: u64) -> Address {
    let mut hasher = Keccak256::new();
    hasher.update(deployer);
    hasher.update(nonce.to_be_bytes());
    let digest = hasher.finalize();
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}

/// `0x` + first 4 bytes + `..` + last 2 bytes, for logs.
pub fn short_hex(bytes: &[u8]) -> String {
    if bytes.len() <= 6 {
        return format!("0x{}", hex::encode(bytes));
    }
    format!(
        "0x{}..{}",
        hex::encode(&bytes[..4]),
        hex::encode(&bytes[bytes.len() - 2..])
    )
}
