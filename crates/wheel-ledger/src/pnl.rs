//! P&L aggregation, per lot and portfolio-wide.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wheel_core::types::{WheelEvent, WheelEventType};

use crate::ledger::DEFAULT_LOT_SHARES;
use crate::models::{Lot, LotState};

/// Per-lot profit breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotPnl {
    /// Premiums received minus premiums paid to close, minus fees
    pub net_premium: Decimal,
    /// Sale/assignment proceeds minus cost basis on disposed shares
    pub realized_stock: Decimal,
    /// (current price - effective cost basis) x shares held, open lots only
    pub unrealized: Decimal,
    pub total: Decimal,
}

/// Portfolio-wide roll-up across lots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPnl {
    pub net_premium: Decimal,
    pub realized_stock: Decimal,
    pub unrealized: Decimal,
    pub total: Decimal,
    pub open_lots: usize,
    pub closed_lots: usize,
}

/// Premium carried by an option event: the explicit premium when recorded,
/// else contracts x price x 100.
fn event_premium(event: &WheelEvent) -> Decimal {
    event.premium.unwrap_or_else(|| {
        let contracts = Decimal::from(event.contracts.unwrap_or(0).abs());
        let price = event.price.unwrap_or(Decimal::ZERO);
        contracts * price * Decimal::from(100)
    })
}

fn event_fees(event: &WheelEvent) -> Decimal {
    match event.event_type {
        // A bare fee line may carry its amount in either field
        WheelEventType::Fee => event
            .fees
            .or(event.price)
            .unwrap_or(Decimal::ZERO),
        _ => event.fees.unwrap_or(Decimal::ZERO),
    }
}

/// Shares disposed by an event and the per-share proceeds.
fn disposal(event: &WheelEvent) -> Option<(Decimal, Decimal)> {
    match event.event_type {
        WheelEventType::SellShares => {
            let shares = Decimal::from(event.quantity_shares.unwrap_or(0));
            let price = event.price.unwrap_or(Decimal::ZERO);
            Some((shares, price))
        }
        WheelEventType::CallAssignment => {
            let shares = Decimal::from(
                event
                    .quantity_shares
                    .unwrap_or_else(|| DEFAULT_LOT_SHARES * event.contracts.unwrap_or(0)),
            );
            // Shares are called away at the strike
            let price = event.strike.or(event.price).unwrap_or(Decimal::ZERO);
            Some((shares, price))
        }
        _ => None,
    }
}

/// Compute a lot's P&L from its events and derived state.
pub fn lot_pnl(
    lot: &Lot,
    events: &[WheelEvent],
    state: &LotState,
    current_price: Option<Decimal>,
) -> LotPnl {
    let mut premium_received = Decimal::ZERO;
    let mut premium_paid = Decimal::ZERO;
    let mut fees = Decimal::ZERO;
    let mut realized_stock = Decimal::ZERO;

    for event in events {
        match event.event_type {
            WheelEventType::SellPutOpen | WheelEventType::SellCallOpen => {
                premium_received += event_premium(event);
            }
            WheelEventType::SellPutClose
            | WheelEventType::BuyPutClose
            | WheelEventType::SellCallClose => {
                premium_paid += event_premium(event);
            }
            _ => {}
        }
        fees += event_fees(event);

        if let Some((shares, proceeds_per_share)) = disposal(event) {
            realized_stock += shares * (proceeds_per_share - lot.cost_basis_effective);
        }
    }

    let unrealized = match current_price {
        Some(price) if !state.status.is_closed() && state.shares_held > 0 => {
            (price - lot.cost_basis_effective) * Decimal::from(state.shares_held)
        }
        _ => Decimal::ZERO,
    };

    let net_premium = premium_received - premium_paid - fees;
    LotPnl {
        net_premium,
        realized_stock,
        unrealized,
        total: net_premium + realized_stock + unrealized,
    }
}

/// Aggregate lot-level P&L into one portfolio summary.
pub fn portfolio_pnl<'a>(lots: impl IntoIterator<Item = (&'a LotState, &'a LotPnl)>) -> PortfolioPnl {
    let mut summary = PortfolioPnl::default();
    for (state, pnl) in lots {
        summary.net_premium += pnl.net_premium;
        summary.realized_stock += pnl.realized_stock;
        summary.unrealized += pnl.unrealized;
        summary.total += pnl.total;
        if state.status.is_closed() {
            summary.closed_lots += 1;
        } else {
            summary.open_lots += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::derive_lot_state;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use wheel_core::types::AcquisitionMethod;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn event(id: &str, event_type: WheelEventType, day: u32) -> WheelEvent {
        WheelEvent {
            id: id.to_string(),
            cycle_id: "cycle-1".to_string(),
            event_type,
            trade_date: date(day),
            quantity_shares: None,
            contracts: None,
            price: None,
            strike: None,
            premium: None,
            fees: None,
            link_event_id: None,
        }
    }

    fn lot() -> Lot {
        Lot {
            lot_number: 1,
            ticker: "AAPL".to_string(),
            cycle_id: "cycle-1".to_string(),
            acquisition_method: AcquisitionMethod::OutrightPurchase,
            acquisition_date: date(1),
            cost_basis_effective: dec!(170),
        }
    }

    #[test]
    fn net_premium_subtracts_closes_and_fees() {
        let events = vec![
            WheelEvent {
                quantity_shares: Some(100),
                price: Some(dec!(170)),
                ..event("e1", WheelEventType::BuyShares, 1)
            },
            WheelEvent {
                premium: Some(dec!(350)),
                fees: Some(dec!(0.65)),
                ..event("e2", WheelEventType::SellCallOpen, 5)
            },
            WheelEvent {
                premium: Some(dec!(120)),
                fees: Some(dec!(0.65)),
                link_event_id: Some("e2".to_string()),
                ..event("e3", WheelEventType::SellCallClose, 12)
            },
        ];
        let state = derive_lot_state(&lot(), &events).unwrap();
        let pnl = lot_pnl(&lot(), &events, &state, None);
        assert_eq!(pnl.net_premium, dec!(228.70)); // 350 - 120 - 1.30
        assert_eq!(pnl.realized_stock, dec!(0));
    }

    #[test]
    fn premium_falls_back_to_contracts_times_price() {
        let open = WheelEvent {
            contracts: Some(2),
            price: Some(dec!(1.50)),
            ..event("e1", WheelEventType::SellPutOpen, 1)
        };
        assert_eq!(event_premium(&open), dec!(300));
    }

    #[test]
    fn called_away_lot_realizes_strike_minus_basis() {
        let events = vec![
            WheelEvent {
                quantity_shares: Some(100),
                price: Some(dec!(170)),
                ..event("e1", WheelEventType::BuyShares, 1)
            },
            WheelEvent {
                premium: Some(dec!(350)),
                ..event("e2", WheelEventType::SellCallOpen, 5)
            },
            WheelEvent {
                contracts: Some(1),
                strike: Some(dec!(180)),
                ..event("e3", WheelEventType::CallAssignment, 20)
            },
        ];
        let state = derive_lot_state(&lot(), &events).unwrap();
        let pnl = lot_pnl(&lot(), &events, &state, Some(dec!(999)));
        assert_eq!(pnl.realized_stock, dec!(1000)); // 100 x (180 - 170)
        assert_eq!(pnl.unrealized, dec!(0), "closed lot has no unrealized P&L");
        assert_eq!(pnl.total, dec!(1350));
    }

    #[test]
    fn open_lot_carries_unrealized() {
        let events = vec![WheelEvent {
            quantity_shares: Some(100),
            price: Some(dec!(170)),
            ..event("e1", WheelEventType::BuyShares, 1)
        }];
        let state = derive_lot_state(&lot(), &events).unwrap();
        let pnl = lot_pnl(&lot(), &events, &state, Some(dec!(175)));
        assert_eq!(pnl.unrealized, dec!(500));
        assert_eq!(pnl.total, dec!(500));
    }

    #[test]
    fn fee_event_amount_may_live_in_price_field() {
        let fee = WheelEvent {
            price: Some(dec!(1.25)),
            ..event("e1", WheelEventType::Fee, 1)
        };
        assert_eq!(event_fees(&fee), dec!(1.25));
    }

    #[test]
    fn portfolio_rollup_counts_open_and_closed() {
        let open_events = vec![WheelEvent {
            quantity_shares: Some(100),
            price: Some(dec!(170)),
            ..event("e1", WheelEventType::BuyShares, 1)
        }];
        let closed_events = vec![
            WheelEvent {
                quantity_shares: Some(100),
                price: Some(dec!(170)),
                ..event("e2", WheelEventType::BuyShares, 1)
            },
            WheelEvent {
                quantity_shares: Some(100),
                price: Some(dec!(185)),
                ..event("e3", WheelEventType::SellShares, 10)
            },
        ];
        let open_state = derive_lot_state(&lot(), &open_events).unwrap();
        let closed_state = derive_lot_state(&lot(), &closed_events).unwrap();
        let open_pnl = lot_pnl(&lot(), &open_events, &open_state, Some(dec!(175)));
        let closed_pnl = lot_pnl(&lot(), &closed_events, &closed_state, None);

        let summary = portfolio_pnl(vec![
            (&open_state, &open_pnl),
            (&closed_state, &closed_pnl),
        ]);
        assert_eq!(summary.open_lots, 1);
        assert_eq!(summary.closed_lots, 1);
        assert_eq!(summary.realized_stock, dec!(1500));
        assert_eq!(summary.unrealized, dec!(500));
        assert_eq!(summary.total, dec!(2000));
    }
}
