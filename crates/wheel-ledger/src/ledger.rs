//! Share balance, coverage and status derivation.

use tracing::{debug, warn};
use wheel_core::types::{AcquisitionMethod, WheelEvent, WheelEventType};
use wheel_core::WheelError;

use crate::models::{Coverage, CoverageKind, CoverageStatus, Lot, LotState, LotStatus};

/// Assumed size of a lot whose opening event predates ledger instrumentation
pub const DEFAULT_LOT_SHARES: i64 = 100;

/// Share effect of a single event. Assignment events fall back to
/// 100 x contracts when the explicit share quantity is absent.
fn share_delta(event: &WheelEvent) -> i64 {
    match event.event_type {
        WheelEventType::BuyShares => event.quantity_shares.unwrap_or(0),
        WheelEventType::PutAssignment => event
            .quantity_shares
            .unwrap_or_else(|| DEFAULT_LOT_SHARES * event.contracts.unwrap_or(0)),
        WheelEventType::SellShares => -event.quantity_shares.unwrap_or(0),
        WheelEventType::CallAssignment => -event
            .quantity_shares
            .unwrap_or_else(|| DEFAULT_LOT_SHARES * event.contracts.unwrap_or(0)),
        _ => 0,
    }
}

/// Fold a lot's events into its share balance (trade-date order).
pub fn fold_share_balance(events: &[WheelEvent]) -> i64 {
    events.iter().map(share_delta).sum()
}

/// Heuristic cover for lots recorded before ledger instrumentation began:
/// a stock-holding lot with a zero computed balance and no closing history
/// is assumed to hold one default lot of 100 shares.
///
/// This models missing opening events, not a correctness guarantee; it is
/// isolated here so it stays independently testable and easy to retire.
pub fn infer_default_shares_when_history_missing(
    computed_balance: i64,
    is_closed: bool,
    acquisition_method: AcquisitionMethod,
) -> Option<i64> {
    if computed_balance == 0 && !is_closed && acquisition_method.holds_shares() {
        Some(DEFAULT_LOT_SHARES)
    } else {
        None
    }
}

/// Whether a later close event settles the given open event: either linked
/// to it directly, or unlinked and simply more recent.
fn settles(close: &WheelEvent, open: &WheelEvent) -> bool {
    match close.link_event_id.as_deref() {
        Some(link) => link == open.id,
        None => true,
    }
}

fn derive_coverage(sorted: &[&WheelEvent], method: AcquisitionMethod) -> Option<Coverage> {
    // Most recent short call wins
    if let Some((idx, open)) = sorted
        .iter()
        .enumerate()
        .rev()
        .find(|(_, e)| e.event_type == WheelEventType::SellCallOpen)
    {
        let closed = sorted[idx + 1..].iter().any(|e| {
            matches!(
                e.event_type,
                WheelEventType::SellCallClose | WheelEventType::CallAssignment
            ) && settles(e, open)
        });
        return Some(Coverage {
            kind: CoverageKind::Call,
            strike: open.strike,
            premium: open.premium,
            status: if closed {
                CoverageStatus::Closed
            } else {
                CoverageStatus::Open
            },
        });
    }

    // Cash-secured-put phase: expose the short put as the collateral marker
    if method == AcquisitionMethod::CashSecuredPut {
        if let Some((idx, open)) = sorted
            .iter()
            .enumerate()
            .rev()
            .find(|(_, e)| e.event_type == WheelEventType::SellPutOpen)
        {
            let closed = sorted[idx + 1..].iter().any(|e| {
                matches!(
                    e.event_type,
                    WheelEventType::SellPutClose
                        | WheelEventType::BuyPutClose
                        | WheelEventType::PutAssignment
                ) && settles(e, open)
            });
            return Some(Coverage {
                kind: CoverageKind::Put,
                strike: open.strike,
                premium: open.premium,
                status: if closed {
                    CoverageStatus::Closed
                } else {
                    CoverageStatus::Open
                },
            });
        }
    }

    None
}

fn derive_status(
    balance: i64,
    sorted: &[&WheelEvent],
    method: AcquisitionMethod,
    coverage: Option<&Coverage>,
) -> LotStatus {
    let called_away = sorted
        .iter()
        .any(|e| e.event_type == WheelEventType::CallAssignment);
    if called_away {
        return LotStatus::ClosedCalledAway;
    }

    let sold_out = balance == 0
        && sorted
            .iter()
            .any(|e| e.event_type == WheelEventType::SellShares);
    if sold_out {
        return LotStatus::ClosedSold;
    }

    if balance > 0 {
        let call_open = matches!(
            coverage,
            Some(Coverage {
                kind: CoverageKind::Call,
                status: CoverageStatus::Open,
                ..
            })
        );
        return if call_open {
            LotStatus::OpenCovered
        } else {
            LotStatus::OpenUncovered
        };
    }

    if method == AcquisitionMethod::CashSecuredPut {
        return LotStatus::CashReserved;
    }

    // Negative or malformed balance: best-effort open state, already flagged
    LotStatus::OpenUncovered
}

/// Derive a lot's share balance, coverage and status from its events.
///
/// Fresh computation on every call; the input events must all belong to the
/// lot's cycle (anything else is a caller contract violation).
pub fn derive_lot_state(lot: &Lot, events: &[WheelEvent]) -> Result<LotState, WheelError> {
    if let Some(stray) = events.iter().find(|e| e.cycle_id != lot.cycle_id) {
        return Err(WheelError::InvalidInput(format!(
            "event {} belongs to cycle {}, not lot {}'s cycle {}",
            stray.id, stray.cycle_id, lot.lot_number, lot.cycle_id
        )));
    }

    let mut sorted: Vec<&WheelEvent> = events.iter().collect();
    sorted.sort_by_key(|e| e.trade_date);

    let mut warnings = Vec::new();
    let mut balance = fold_share_balance(events);
    if balance < 0 {
        warn!(
            ticker = %lot.ticker,
            lot = lot.lot_number,
            balance,
            "negative share balance after folding events"
        );
        warnings.push(format!(
            "negative share balance ({balance}) after folding events; flagged for manual review"
        ));
    }

    let called_away = sorted
        .iter()
        .any(|e| e.event_type == WheelEventType::CallAssignment);
    let sold_out = balance == 0
        && sorted
            .iter()
            .any(|e| e.event_type == WheelEventType::SellShares);

    if let Some(assumed) = infer_default_shares_when_history_missing(
        balance,
        called_away || sold_out,
        lot.acquisition_method,
    ) {
        debug!(
            ticker = %lot.ticker,
            lot = lot.lot_number,
            assumed,
            "no share history for stock-holding lot; assuming default lot size"
        );
        balance = assumed;
    }

    let coverage = derive_coverage(&sorted, lot.acquisition_method);
    let status = derive_status(balance, &sorted, lot.acquisition_method, coverage.as_ref());

    Ok(LotState {
        shares_held: balance,
        status,
        coverage,
        warnings,
    })
}

/// Partition a raw event log by cycle, preserving first-seen cycle order.
pub fn group_by_cycle(events: &[WheelEvent]) -> Vec<(String, Vec<WheelEvent>)> {
    let mut groups: Vec<(String, Vec<WheelEvent>)> = Vec::new();
    for event in events {
        match groups.iter_mut().find(|(cycle, _)| *cycle == event.cycle_id) {
            Some((_, bucket)) => bucket.push(event.clone()),
            None => groups.push((event.cycle_id.clone(), vec![event.clone()])),
        }
    }
    groups
}
