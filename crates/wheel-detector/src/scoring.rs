//! Confidence scoring policy.
//!
//! Additive point table kept as named constants so each factor is auditable
//! and unit-testable on its own. The final score is clamped to [0, 100].

use rust_decimal::Decimal;

use crate::models::{MarketContext, WheelStrategy};

pub const BASE_SCORE: i32 = 50;

pub const BONUS_FULL_WHEEL: i32 = 30;
pub const BONUS_COVERED_CALL: i32 = 20;
pub const BONUS_CASH_SECURED_PUT: i32 = 15;
pub const BONUS_NAKED_STOCK: i32 = 10;

/// Cash-adequacy adjustment for put-backed strategies
pub const CASH_FULLY_COVERED: i32 = 15;
pub const CASH_HALF_COVERED: i32 = 5;
pub const CASH_SHORTFALL: i32 = -10;

/// Time-horizon adjustment from average days to expiration
pub const HORIZON_COMFORTABLE: i32 = 10;
pub const HORIZON_IMMINENT: i32 = -15;
pub const COMFORTABLE_DTE_DAYS: i64 = 30;
pub const IMMINENT_DTE_DAYS: i64 = 7;

/// Optional market-context nudges
pub const CONTEXT_ELEVATED_VOLATILITY: i32 = 5;
pub const CONTEXT_BULLISH_TREND: i32 = 5;

pub fn strategy_bonus(strategy: WheelStrategy) -> i32 {
    match strategy {
        WheelStrategy::FullWheel => BONUS_FULL_WHEEL,
        WheelStrategy::CoveredCall => BONUS_COVERED_CALL,
        WheelStrategy::CashSecuredPut => BONUS_CASH_SECURED_PUT,
        WheelStrategy::NakedStock => BONUS_NAKED_STOCK,
    }
}

pub fn cash_adequacy_adjustment(
    strategy: WheelStrategy,
    cash_balance: Decimal,
    cash_required: Decimal,
) -> i32 {
    if !strategy.is_put_backed() || cash_required <= Decimal::ZERO {
        return 0;
    }
    if cash_balance >= cash_required {
        CASH_FULLY_COVERED
    } else if cash_balance >= cash_required / Decimal::from(2) {
        CASH_HALF_COVERED
    } else {
        CASH_SHORTFALL
    }
}

pub fn time_horizon_adjustment(avg_days_to_expiration: Option<i64>) -> i32 {
    match avg_days_to_expiration {
        Some(dte) if dte > COMFORTABLE_DTE_DAYS => HORIZON_COMFORTABLE,
        Some(dte) if dte < IMMINENT_DTE_DAYS => HORIZON_IMMINENT,
        _ => 0,
    }
}

pub fn market_context_adjustment(context: Option<&MarketContext>) -> i32 {
    let Some(ctx) = context else { return 0 };
    let mut adjustment = 0;
    if ctx.elevated_volatility {
        adjustment += CONTEXT_ELEVATED_VOLATILITY;
    }
    if ctx.bullish_trend {
        adjustment += CONTEXT_BULLISH_TREND;
    }
    adjustment
}

/// Combine all factors into the clamped 0-100 confidence score.
pub fn confidence_score(
    strategy: WheelStrategy,
    cash_balance: Decimal,
    cash_required: Decimal,
    avg_days_to_expiration: Option<i64>,
    context: Option<&MarketContext>,
) -> i32 {
    let score = BASE_SCORE
        + strategy_bonus(strategy)
        + cash_adequacy_adjustment(strategy, cash_balance, cash_required)
        + time_horizon_adjustment(avg_days_to_expiration)
        + market_context_adjustment(context);
    score.clamp(0, 100)
}
