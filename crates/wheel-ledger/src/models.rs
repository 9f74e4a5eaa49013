use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wheel_core::types::AcquisitionMethod;

/// Lot lifecycle status, derived fresh from events on every read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    OpenUncovered,
    OpenCovered,
    CashReserved,
    ClosedSold,
    ClosedCalledAway,
}

impl LotStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, LotStatus::ClosedSold | LotStatus::ClosedCalledAway)
    }
}

/// What kind of contract currently "covers" the lot.
///
/// `Put` marks cash-secured-put collateral: a semantically different thing
/// shown through the same structure so display stays uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageKind {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    Open,
    Closed,
}

/// Coverage derived from the most recent unmatched short-option open event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub kind: CoverageKind,
    pub strike: Option<Decimal>,
    pub premium: Option<Decimal>,
    pub status: CoverageStatus,
}

/// A 100-share-equivalent block tracked through one acquisition path.
///
/// Only identity and acquisition facts are stored; everything else (shares,
/// coverage, status) is derived from the lot's events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub lot_number: i64,
    pub ticker: String,
    /// Ledger cycle this lot's events belong to
    pub cycle_id: String,
    pub acquisition_method: AcquisitionMethod,
    pub acquisition_date: NaiveDate,
    /// Per-share cost basis net of collected premium
    pub cost_basis_effective: Decimal,
}

/// Derived view of a lot at query time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotState {
    pub shares_held: i64,
    pub status: LotStatus,
    pub coverage: Option<Coverage>,
    /// Data-quality warnings (e.g. negative balance after folding events);
    /// the state is still best-effort usable, flagged for manual review
    pub warnings: Vec<String>,
}
