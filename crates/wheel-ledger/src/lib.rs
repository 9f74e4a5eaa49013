//! Event-sourced lot ledger.
//!
//! Share counts, option coverage, lot status and P&L are recomputed from the
//! event list on every query; no derived state is retained between calls, so
//! there is nothing to go stale.

pub mod ledger;
pub mod models;
pub mod pnl;

pub use ledger::{
    derive_lot_state, fold_share_balance, group_by_cycle, infer_default_shares_when_history_missing,
};
pub use models::{
    Coverage, CoverageKind, CoverageStatus, Lot, LotState, LotStatus,
};
pub use pnl::{lot_pnl, portfolio_pnl, LotPnl, PortfolioPnl};
