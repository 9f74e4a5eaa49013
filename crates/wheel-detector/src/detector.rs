//! Per-ticker strategy classification.
//!
//! Classification is an explicit, ordered list of predicate -> strategy
//! rules; the first match wins. The ordering is a policy contract (a full
//! wheel must never be reported as a covered call), so it lives in one
//! visible table rather than in control flow.

use rust_decimal::Decimal;
use tracing::debug;
use wheel_core::types::Position;

use crate::models::{ConfidenceBucket, DetectionResult, DetectorOptions, WheelStrategy};
use crate::risk::assess_risk;
use crate::scoring::{self, confidence_score};

/// Minimum share block backing one option contract
pub const SHARES_PER_CONTRACT: i64 = 100;

/// Aggregate shape of one ticker's classifiable positions
#[derive(Debug, Clone, Copy, Default)]
struct GroupProfile {
    total_shares: i64,
    short_calls: usize,
    short_puts: usize,
    option_positions: usize,
}

impl GroupProfile {
    fn from_positions(positions: &[Position]) -> Self {
        let mut profile = GroupProfile::default();
        for position in positions.iter().filter(|p| p.is_classifiable()) {
            profile.total_shares += position.share_count();
            if position.is_option() {
                profile.option_positions += 1;
            }
            if position.is_short_call() {
                profile.short_calls += 1;
            }
            if position.is_short_put() {
                profile.short_puts += 1;
            }
        }
        profile
    }
}

/// First match wins; ordering here is the classification contract.
const CLASSIFICATION_RULES: &[(WheelStrategy, fn(&GroupProfile) -> bool)] = &[
    (WheelStrategy::FullWheel, |p| {
        p.total_shares >= SHARES_PER_CONTRACT && p.short_calls > 0 && p.short_puts > 0
    }),
    (WheelStrategy::CoveredCall, |p| {
        p.total_shares >= SHARES_PER_CONTRACT && p.short_calls > 0
    }),
    (WheelStrategy::CashSecuredPut, |p| p.short_puts > 0),
    // Fractional lots are not actionable for a 100-share-per-contract
    // strategy, so sub-100 stock without options yields no classification.
    (WheelStrategy::NakedStock, |p| {
        p.total_shares >= SHARES_PER_CONTRACT && p.option_positions == 0
    }),
];

fn classify(profile: &GroupProfile) -> Option<WheelStrategy> {
    CLASSIFICATION_RULES
        .iter()
        .find(|(_, matches)| matches(profile))
        .map(|(strategy, _)| *strategy)
}

/// Collateral to secure the short puts: sum of |contracts| x strike x 100.
fn cash_required(positions: &[Position]) -> Decimal {
    positions
        .iter()
        .filter(|p| p.is_classifiable() && p.is_short_put())
        .filter_map(|p| {
            p.strike()
                .map(|strike| Decimal::from(p.signed_quantity.abs()) * strike * Decimal::from(100))
        })
        .sum()
}

/// Average days-to-expiration across the group's classifiable options.
fn average_days_to_expiration(positions: &[Position], options: &DetectorOptions) -> Option<i64> {
    let dtes: Vec<i64> = positions
        .iter()
        .filter(|p| p.is_classifiable())
        .filter_map(|p| p.days_to_expiration(options.as_of))
        .collect();
    if dtes.is_empty() {
        return None;
    }
    Some(dtes.iter().sum::<i64>() / dtes.len() as i64)
}

fn build_recommendations(
    strategy: WheelStrategy,
    options: &DetectorOptions,
    cash_needed: Decimal,
    avg_dte: Option<i64>,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if strategy.is_put_backed() && cash_needed > options.cash_balance {
        recommendations.push(format!(
            "Cash shortfall: ${cash_needed} required to secure short puts, ${} available",
            options.cash_balance
        ));
    }

    if let Some(dte) = avg_dte {
        if dte < scoring::IMMINENT_DTE_DAYS {
            recommendations.push(
                "Expiration imminent: roll or close short options to avoid assignment".to_string(),
            );
        }
    }

    match strategy {
        WheelStrategy::NakedStock => recommendations
            .push("Holding 100+ uncovered shares: consider selling a covered call".to_string()),
        WheelStrategy::CashSecuredPut => recommendations
            .push("If assigned, shares can seed the covered-call leg of the wheel".to_string()),
        _ => {}
    }

    recommendations
}

/// Classify one ticker's position group. `None` when no strategy pattern
/// matches (not an error, simply omitted from results).
pub fn detect_for_ticker(
    ticker: &str,
    positions: &[Position],
    options: &DetectorOptions,
) -> Option<DetectionResult> {
    let profile = GroupProfile::from_positions(positions);
    let strategy = classify(&profile)?;

    let cash_needed = cash_required(positions);
    let avg_dte = average_days_to_expiration(positions, options);
    let score = confidence_score(
        strategy,
        options.cash_balance,
        cash_needed,
        avg_dte,
        options.market_context.as_ref(),
    );

    debug!(ticker, %strategy, score, "classified position group");

    Some(DetectionResult {
        ticker: ticker.to_string(),
        strategy,
        confidence: ConfidenceBucket::from_score(score),
        confidence_score: score,
        risk_assessment: assess_risk(strategy, positions, options),
        positions: positions.to_vec(),
        cash_required: cash_needed,
        recommendations: build_recommendations(strategy, options, cash_needed, avg_dte),
    })
}

/// Classify a whole portfolio: group by underlying, classify each group,
/// and order results by strategy complexity then descending confidence
/// (ties keep stable input order).
pub fn detect_strategies(
    positions: &[Position],
    options: &DetectorOptions,
) -> Vec<DetectionResult> {
    let groups = position_feed::group_by_underlying(positions.to_vec());

    let mut results: Vec<DetectionResult> = groups
        .iter()
        .filter_map(|(ticker, group)| detect_for_ticker(ticker, group, options))
        .collect();

    results.sort_by(|a, b| {
        a.strategy
            .complexity_rank()
            .cmp(&b.strategy.complexity_rank())
            .then(b.confidence_score.cmp(&a.confidence_score))
    });

    results
}
