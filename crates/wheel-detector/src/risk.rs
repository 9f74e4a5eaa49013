//! Qualitative risk assessment for a classified position group.
//!
//! Starts at `Medium` and escalates; the read-out lists named factors rather
//! than a single opaque score so downstream display can explain the rating.

use wheel_core::types::Position;

use crate::models::{DetectorOptions, RiskAssessment, RiskLevel, RiskTolerance, WheelStrategy};
use crate::scoring::IMMINENT_DTE_DAYS;

const TIME_DECAY_WATCH_DAYS: i64 = 14;
const CONCENTRATION_CONTRACTS: i64 = 3;

pub fn assess_risk(
    strategy: WheelStrategy,
    positions: &[Position],
    options: &DetectorOptions,
) -> RiskAssessment {
    let mut level = RiskLevel::Medium;
    let mut factors = Vec::new();

    let short_options: Vec<&Position> = positions
        .iter()
        .filter(|p| p.is_short_call() || p.is_short_put())
        .collect();

    let short_contracts: i64 = short_options.iter().map(|p| p.signed_quantity.abs()).sum();
    if short_contracts > 0 {
        factors.push(format!(
            "Assignment exposure on {short_contracts} short contract(s)"
        ));
    }

    let min_dte = short_options
        .iter()
        .filter_map(|p| p.days_to_expiration(options.as_of))
        .min();

    if let Some(dte) = min_dte {
        if dte <= IMMINENT_DTE_DAYS {
            level = RiskLevel::High;
            factors.push(format!(
                "Short option expires within {dte} day(s): assignment likely if in the money"
            ));
        } else if dte <= TIME_DECAY_WATCH_DAYS {
            factors.push(format!("Time decay accelerating with {dte} days to expiration"));
        }
    }

    if options.risk_tolerance == RiskTolerance::Conservative {
        level = RiskLevel::High;
        factors.push("Conservative risk tolerance relative to option exposure".to_string());
    }

    if short_contracts >= CONCENTRATION_CONTRACTS {
        factors.push("Concentration: multiple short contracts on a single underlying".to_string());
    }

    if strategy == WheelStrategy::NakedStock {
        factors.push("Uncovered stock: no premium income or downside cushion".to_string());
    }

    RiskAssessment { level, factors }
}
