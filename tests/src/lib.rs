//! # Privy-Trade Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Wired engine + demo participants
//! └── integration/
//!     ├── e2e.rs             # Nine-scene trade and late funding
//!     ├── confidentiality.rs # Non-member answers, leak checks
//!     ├── state_machine.rs   # Transition order and monotonicity
//!     ├── idempotence.rs     # At most one payout per trade
//!     └── escrow_property.rs # Balance never negative
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pt-tests
//! cargo test -p pt-tests integration::confidentiality
//! cargo bench -p pt-tests
//! ```

pub mod harness;
pub mod integration;
