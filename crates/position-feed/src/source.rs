//! The seam to the external brokerage feed.
//!
//! Providers disagree on field names and sign conventions, so the raw shape
//! keeps every variant optional and lets the normalizer reconcile them. The
//! engine itself never talks to the network; hosts implement
//! [`PositionSource`] over whatever transport they use (live API, static
//! import file, fixture data).

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One provider-shaped holding record, prior to normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPosition {
    pub symbol: String,
    /// Explicit underlying ticker, when the provider supplies one
    #[serde(default)]
    pub underlying_symbol: Option<String>,
    /// Separate long/short quantity feeds (e.g. Schwab-style)
    #[serde(default)]
    pub long_quantity: Option<f64>,
    #[serde(default)]
    pub short_quantity: Option<f64>,
    /// Single signed quantity feeds (positive = long, negative = short)
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub market_value: Option<Decimal>,
    #[serde(default)]
    pub average_price: Option<Decimal>,
    #[serde(default)]
    pub average_long_price: Option<Decimal>,
    /// Some feeds carry a distinct cost basis for the short side
    #[serde(default)]
    pub average_short_price: Option<Decimal>,
    /// Provider asset class hint ("EQUITY", "OPTION", ...)
    #[serde(default)]
    pub asset_type: Option<String>,
}

/// Supplier of raw position records (live brokerage API, import file, ...).
///
/// Fetch failures, retries and timeouts belong to the implementor; the engine
/// only requires that a successful fetch yields the full current snapshot.
pub trait PositionSource: Send + Sync {
    fn fetch_raw(&self) -> Result<Vec<RawPosition>>;

    /// Source name for logging
    fn source_name(&self) -> &str {
        "unknown"
    }
}
