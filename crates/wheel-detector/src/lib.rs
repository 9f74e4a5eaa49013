//! Wheel strategy detection.
//!
//! Classifies each ticker's position group into a wheel-strategy type with a
//! 0-100 confidence score and a structured risk assessment. Pure and
//! synchronous: input positions are never mutated, results are fresh objects.

pub mod detector;
pub mod models;
pub mod risk;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use detector::{detect_for_ticker, detect_strategies};
pub use models::{
    ConfidenceBucket, DetectionResult, DetectorOptions, MarketContext, RiskAssessment, RiskLevel,
    RiskTolerance, WheelStrategy,
};
