//! Raw record normalization.
//!
//! Converts provider-shaped records into the canonical [`Position`] model:
//! one output per input, except flat records (no quantity reported on any
//! field) which carry no signal and are dropped. Dirty individual records are
//! downgraded, never fatal.

use rust_decimal::Decimal;
use tracing::{debug, warn};
use wheel_core::symbols::parse_option_symbol;
use wheel_core::types::{ParseConfidence, Position, PositionDetails};
use wheel_core::WheelError;

use crate::source::RawPosition;

/// Normalize one raw record. Returns `None` for flat (closed) positions.
pub fn normalize_position(raw: &RawPosition) -> Option<Position> {
    // Flat means no quantity reported on any field. Offsetting long/short
    // quantities net to zero but still emit one record, kept visible for
    // display even though it carries no strategy signal.
    if !has_reported_quantity(raw) {
        return None;
    }
    let net = net_signed_quantity(raw);
    let signed_quantity = net.round() as i64;

    // Short positions carry a distinct average price in some feeds; picking
    // the wrong side silently corrupts P&L.
    let average_price = if net < 0.0 {
        raw.average_short_price.or(raw.average_price)
    } else {
        raw.average_long_price.or(raw.average_price)
    };
    let average_price = average_price.unwrap_or_else(|| {
        let anomaly = WheelError::IncompleteRecord(format!("{}: no average price", raw.symbol));
        warn!(%anomaly, "defaulting to 0");
        Decimal::ZERO
    });
    let market_value = raw.market_value.unwrap_or_else(|| {
        let anomaly = WheelError::IncompleteRecord(format!("{}: no market value", raw.symbol));
        warn!(%anomaly, "defaulting to 0");
        Decimal::ZERO
    });

    let parsed = parse_option_symbol(&raw.symbol);
    let expects_option = raw
        .asset_type
        .as_deref()
        .map(|t| t.eq_ignore_ascii_case("OPTION"))
        .unwrap_or(false);

    let (details, parse_confidence) = if let (Some(option_type), Some(strike), Some(expiration)) =
        (parsed.option_type, parsed.strike, parsed.expiration)
    {
        (
            PositionDetails::Option {
                option_type,
                strike,
                expiration,
            },
            ParseConfidence::High,
        )
    } else if expects_option {
        // Provider says option but the symbol would not decode: keep the
        // record for display, exclude it from strategy math.
        warn!(
            symbol = %raw.symbol,
            error = parsed.parse_error.as_deref().unwrap_or("unknown"),
            "option position with unparseable symbol, downgrading to stock-like"
        );
        (PositionDetails::Stock, ParseConfidence::Low)
    } else {
        (PositionDetails::Stock, ParseConfidence::High)
    };

    // Underlying resolution: explicit provider field, then the symbol
    // parser, then the raw symbol itself.
    let underlying = raw
        .underlying_symbol
        .clone()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| {
            if parsed.is_option {
                parsed.ticker.clone()
            } else {
                raw.symbol.trim().to_string()
            }
        });

    Some(Position {
        symbol: raw.symbol.clone(),
        underlying,
        details,
        signed_quantity,
        market_value,
        average_price,
        parse_confidence,
    })
}

/// Normalize a batch, dropping flat records.
pub fn normalize_positions(raw: &[RawPosition]) -> Vec<Position> {
    let positions: Vec<Position> = raw.iter().filter_map(normalize_position).collect();
    debug!(
        raw = raw.len(),
        normalized = positions.len(),
        "normalized position batch"
    );
    positions
}

fn has_reported_quantity(raw: &RawPosition) -> bool {
    [raw.quantity, raw.long_quantity, raw.short_quantity]
        .iter()
        .any(|q| q.map(|v| v != 0.0).unwrap_or(false))
}

fn net_signed_quantity(raw: &RawPosition) -> f64 {
    match raw.quantity {
        Some(q) => q,
        None => raw.long_quantity.unwrap_or(0.0) - raw.short_quantity.unwrap_or(0.0),
    }
}
