//! Encoded option symbol parsing.
//!
//! Brokerage feeds encode option contracts as `TICKER + YYMMDD + C|P +
//! 8-digit strike scaled x1000`, with the ticker padded to six characters
//! (e.g. `AAPL  240816C00180000`). Parsing is fail-open: a symbol that does
//! not match the pattern is downgraded to a plain stock-like identifier so
//! one malformed record never blocks classification of the rest of the
//! portfolio.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::WheelError;
use crate::types::{OptionType, ParseConfidence};

fn option_symbol_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Z.]{1,6})(\d{6})([CP])(\d{8})$").expect("static pattern compiles")
    })
}

/// Result of decoding a (possibly option-encoded) symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSymbol {
    pub is_option: bool,
    pub ticker: String,
    pub option_type: Option<OptionType>,
    pub strike: Option<Decimal>,
    pub expiration: Option<NaiveDate>,
    pub confidence: ParseConfidence,
    /// Recorded anomaly when the symbol looked like an option but failed to parse
    pub parse_error: Option<String>,
}

impl ParsedSymbol {
    fn stock_like(raw: &str, error: Option<String>) -> Self {
        Self {
            is_option: false,
            ticker: raw.trim().to_string(),
            option_type: None,
            strike: None,
            expiration: None,
            confidence: ParseConfidence::Low,
            parse_error: error,
        }
    }
}

/// Decode an encoded option symbol into structured fields.
///
/// Never fails: on any mismatch the raw symbol is returned as a low-confidence
/// stock-like result carrying the recorded [`WheelError::ParseFailure`] text.
pub fn parse_option_symbol(raw: &str) -> ParsedSymbol {
    // Tolerate embedded whitespace (OCC pads the ticker to six characters)
    let condensed: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    match decode(raw, &condensed) {
        Ok(parsed) => parsed,
        Err(error) => ParsedSymbol::stock_like(raw, Some(error.to_string())),
    }
}

fn decode(raw: &str, condensed: &str) -> Result<ParsedSymbol, WheelError> {
    let caps = option_symbol_re().captures(condensed).ok_or_else(|| {
        WheelError::ParseFailure(format!("symbol does not match option pattern: {raw}"))
    })?;

    let ticker = caps[1].to_string();
    let expiration = match parse_expiration(&caps[2]) {
        Some(d) => d,
        None => {
            let error =
                WheelError::ParseFailure(format!("invalid expiration date in option symbol: {raw}"));
            warn!(%error, "option symbol rejected");
            return Err(error);
        }
    };

    let option_type = if &caps[3] == "C" {
        OptionType::Call
    } else {
        OptionType::Put
    };

    // 8 digits scaled x1000; always parses after the regex match
    let scaled: i64 = caps[4].parse().unwrap_or(0);
    let strike = Decimal::new(scaled, 3).normalize();

    Ok(ParsedSymbol {
        is_option: true,
        ticker,
        option_type: Some(option_type),
        strike: Some(strike),
        expiration: Some(expiration),
        confidence: ParseConfidence::High,
        parse_error: None,
    })
}

fn parse_expiration(yymmdd: &str) -> Option<NaiveDate> {
    let yy: i32 = yymmdd[0..2].parse().ok()?;
    let mm: u32 = yymmdd[2..4].parse().ok()?;
    let dd: u32 = yymmdd[4..6].parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + yy, mm, dd)
}

/// Reconstruct the encoded symbol from parsed fields (ticker padded to six
/// characters as brokerage feeds do).
pub fn format_option_symbol(
    ticker: &str,
    expiration: NaiveDate,
    option_type: OptionType,
    strike: Decimal,
) -> String {
    let scaled = (strike * Decimal::from(1000)).round().to_i64().unwrap_or(0);
    format!(
        "{:<6}{}{}{:08}",
        ticker,
        expiration.format("%y%m%d"),
        option_type.flag(),
        scaled
    )
}
