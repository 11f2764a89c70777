//! # Adapters Layer
//!
//! Bind the outbound ports to the trade lifecycle and escrow ledger services.

mod escrow_payout;
mod trade_source;

pub use escrow_payout::EscrowPayoutAdapter;
pub use trade_source::TradeSourceAdapter;
