use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use wheel_core::symbols::format_option_symbol;
use wheel_core::types::{OptionType, ParseConfidence, Position, PositionDetails};

use crate::models::{
    ConfidenceBucket, DetectorOptions, MarketContext, RiskTolerance, WheelStrategy,
};
use crate::{detect_for_ticker, detect_strategies};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn options_with_cash(cash: Decimal) -> DetectorOptions {
    DetectorOptions {
        cash_balance: cash,
        risk_tolerance: RiskTolerance::Moderate,
        market_context: None,
        as_of: as_of(),
    }
}

fn stock(ticker: &str, shares: i64, avg_price: Decimal) -> Position {
    Position {
        symbol: ticker.to_string(),
        underlying: ticker.to_string(),
        details: PositionDetails::Stock,
        signed_quantity: shares,
        market_value: Decimal::from(shares) * avg_price,
        average_price: avg_price,
        parse_confidence: ParseConfidence::High,
    }
}

fn short_option(
    ticker: &str,
    option_type: OptionType,
    strike: Decimal,
    dte: i64,
    contracts: i64,
) -> Position {
    let expiration = as_of() + Duration::days(dte);
    Position {
        symbol: format_option_symbol(ticker, expiration, option_type, strike),
        underlying: ticker.to_string(),
        details: PositionDetails::Option {
            option_type,
            strike,
            expiration,
        },
        signed_quantity: -contracts,
        market_value: dec!(-200) * Decimal::from(contracts),
        average_price: dec!(2),
        parse_confidence: ParseConfidence::High,
    }
}

fn unparsed(ticker: &str) -> Position {
    Position {
        symbol: format!("{ticker}_BAD_SYMBOL"),
        underlying: ticker.to_string(),
        details: PositionDetails::Stock,
        signed_quantity: -1,
        market_value: Decimal::ZERO,
        average_price: Decimal::ZERO,
        parse_confidence: ParseConfidence::Low,
    }
}

#[test]
fn covered_call_example_scenario() {
    // 100 shares AAPL @ $170, short 1 call strike $180 expiring in 20 days
    let positions = vec![
        stock("AAPL", 100, dec!(170)),
        short_option("AAPL", OptionType::Call, dec!(180), 20, 1),
    ];
    let results = detect_strategies(&positions, &options_with_cash(dec!(0)));

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.ticker, "AAPL");
    assert_eq!(result.strategy, WheelStrategy::CoveredCall);
    assert_eq!(result.confidence, ConfidenceBucket::High);
    assert_eq!(result.cash_required, Decimal::ZERO);
}

#[test]
fn full_wheel_beats_covered_call() {
    let positions = vec![
        stock("AAPL", 100, dec!(170)),
        short_option("AAPL", OptionType::Call, dec!(180), 20, 1),
        short_option("AAPL", OptionType::Put, dec!(160), 20, 1),
    ];
    let result = detect_for_ticker("AAPL", &positions, &options_with_cash(dec!(20000))).unwrap();
    assert_eq!(result.strategy, WheelStrategy::FullWheel);
}

#[test]
fn cash_secured_put_independent_of_stock() {
    // Short put with a sub-lot stock holding still classifies as CSP
    let positions = vec![
        stock("NVDA", 40, dec!(90)),
        short_option("NVDA", OptionType::Put, dec!(85), 25, 2),
    ];
    let result = detect_for_ticker("NVDA", &positions, &options_with_cash(dec!(20000))).unwrap();
    assert_eq!(result.strategy, WheelStrategy::CashSecuredPut);
    assert_eq!(result.cash_required, dec!(17000)); // 2 x 85 x 100
}

#[test]
fn naked_stock_requires_full_lot() {
    let full = detect_for_ticker("F", &[stock("F", 100, dec!(12))], &options_with_cash(dec!(0)));
    assert_eq!(full.unwrap().strategy, WheelStrategy::NakedStock);

    let fractional =
        detect_for_ticker("F", &[stock("F", 60, dec!(12))], &options_with_cash(dec!(0)));
    assert!(fractional.is_none(), "sub-100 share lot is not actionable");
}

#[test]
fn flat_group_yields_no_result() {
    assert!(detect_for_ticker("AAPL", &[], &options_with_cash(dec!(0))).is_none());
}

#[test]
fn unparsed_positions_are_excluded_from_strategy_math() {
    // The bad record rides along for display but must not flip the
    // classification to covered call / full wheel.
    let positions = vec![stock("AAPL", 100, dec!(170)), unparsed("AAPL")];
    let result = detect_for_ticker("AAPL", &positions, &options_with_cash(dec!(0))).unwrap();
    assert_eq!(result.strategy, WheelStrategy::NakedStock);
    assert_eq!(result.positions.len(), 2, "unparsed record retained for display");
}

#[test]
fn one_bad_ticker_does_not_block_the_rest() {
    let positions = vec![
        unparsed("JUNK"),
        stock("AAPL", 100, dec!(170)),
        short_option("AAPL", OptionType::Call, dec!(180), 20, 1),
    ];
    let results = detect_strategies(&positions, &options_with_cash(dec!(0)));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].ticker, "AAPL");
    assert_eq!(results[0].strategy, WheelStrategy::CoveredCall);
}

#[test]
fn results_ordered_by_complexity_then_score() {
    let positions = vec![
        stock("F", 100, dec!(12)),
        stock("NVDA", 40, dec!(90)),
        short_option("NVDA", OptionType::Put, dec!(85), 40, 1),
        stock("AAPL", 100, dec!(170)),
        short_option("AAPL", OptionType::Call, dec!(180), 20, 1),
        short_option("AAPL", OptionType::Put, dec!(160), 20, 1),
    ];
    let results = detect_strategies(&positions, &options_with_cash(dec!(50000)));
    let strategies: Vec<WheelStrategy> = results.iter().map(|r| r.strategy).collect();
    assert_eq!(
        strategies,
        vec![
            WheelStrategy::FullWheel,
            WheelStrategy::CashSecuredPut,
            WheelStrategy::NakedStock,
        ]
    );
}

#[test]
fn market_context_nudges_score_upward() {
    let positions = vec![
        stock("AAPL", 100, dec!(170)),
        short_option("AAPL", OptionType::Call, dec!(180), 20, 1),
    ];
    let plain = detect_for_ticker("AAPL", &positions, &options_with_cash(dec!(0))).unwrap();

    let mut boosted_options = options_with_cash(dec!(0));
    boosted_options.market_context = Some(MarketContext {
        elevated_volatility: true,
        bullish_trend: true,
    });
    let boosted = detect_for_ticker("AAPL", &positions, &boosted_options).unwrap();

    assert_eq!(boosted.confidence_score - plain.confidence_score, 10);
}

#[test]
fn imminent_expiration_produces_roll_recommendation() {
    let positions = vec![
        stock("AAPL", 100, dec!(170)),
        short_option("AAPL", OptionType::Call, dec!(180), 3, 1),
    ];
    let result = detect_for_ticker("AAPL", &positions, &options_with_cash(dec!(0))).unwrap();
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("roll or close")));
}
