use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wheel_core::types::Position;

/// Detected wheel-strategy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelStrategy {
    FullWheel,
    CoveredCall,
    CashSecuredPut,
    NakedStock,
}

impl WheelStrategy {
    /// Ordering rank for cross-ticker output sorting (most complex first)
    pub fn complexity_rank(&self) -> u8 {
        match self {
            WheelStrategy::FullWheel => 0,
            WheelStrategy::CoveredCall => 1,
            WheelStrategy::CashSecuredPut => 2,
            WheelStrategy::NakedStock => 3,
        }
    }

    /// Whether the strategy is backed by short puts requiring cash collateral
    pub fn is_put_backed(&self) -> bool {
        matches!(
            self,
            WheelStrategy::FullWheel | WheelStrategy::CashSecuredPut
        )
    }
}

impl std::fmt::Display for WheelStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WheelStrategy::FullWheel => write!(f, "full_wheel"),
            WheelStrategy::CoveredCall => write!(f, "covered_call"),
            WheelStrategy::CashSecuredPut => write!(f, "cash_secured_put"),
            WheelStrategy::NakedStock => write!(f, "naked_stock"),
        }
    }
}

/// Confidence bucket derived from the numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBucket {
    High,
    Medium,
    Low,
}

impl ConfidenceBucket {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 70 => ConfidenceBucket::High,
            s if s >= 40 => ConfidenceBucket::Medium,
            _ => ConfidenceBucket::Low,
        }
    }
}

/// Caller's appetite for assignment risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

/// Optional market hints nudging the confidence score
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MarketContext {
    pub elevated_volatility: bool,
    pub bullish_trend: bool,
}

/// Detector configuration supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorOptions {
    /// Settled cash available to secure short puts
    pub cash_balance: Decimal,
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub market_context: Option<MarketContext>,
    /// Evaluation date for days-to-expiration math
    pub as_of: NaiveDate,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            cash_balance: Decimal::ZERO,
            risk_tolerance: RiskTolerance::Moderate,
            market_context: None,
            as_of: Utc::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Qualitative risk read-out; factors explain *why*, for downstream display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub factors: Vec<String>,
}

/// Per-ticker classification output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub ticker: String,
    pub strategy: WheelStrategy,
    pub confidence: ConfidenceBucket,
    /// Clamped to [0, 100]
    pub confidence_score: i32,
    pub risk_assessment: RiskAssessment,
    /// The positions that drove the classification (unparsed ones included
    /// for display)
    pub positions: Vec<Position>,
    /// Collateral required to secure the short puts involved
    pub cash_required: Decimal,
    pub recommendations: Vec<String>,
}
