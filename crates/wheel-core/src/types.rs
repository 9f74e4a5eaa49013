use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Call or put side of an option contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Single-letter flag as it appears in encoded option symbols
    pub fn flag(&self) -> char {
        match self {
            OptionType::Call => 'C',
            OptionType::Put => 'P',
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// How confidently a raw record was parsed into the canonical model.
///
/// `Low` marks positions whose option symbol failed to parse; they are kept
/// for display but excluded from strategy math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseConfidence {
    High,
    Medium,
    Low,
}

/// Stock vs option detail of a normalized position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionDetails {
    Stock,
    Option {
        option_type: OptionType,
        strike: Decimal,
        expiration: NaiveDate,
    },
}

/// One normalized brokerage holding line.
///
/// Produced exclusively by the position-feed normalizer; downstream
/// components never re-interpret raw provider fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Raw symbol as reported by the provider (possibly option-encoded)
    pub symbol: String,
    /// Resolved underlying ticker (equals `symbol` for stock)
    pub underlying: String,
    pub details: PositionDetails,
    /// Positive = long, negative = short. Shares for stock, contracts for options.
    pub signed_quantity: i64,
    pub market_value: Decimal,
    pub average_price: Decimal,
    pub parse_confidence: ParseConfidence,
}

impl Position {
    pub fn is_option(&self) -> bool {
        matches!(self.details, PositionDetails::Option { .. })
    }

    /// Reliable enough to feed strategy classification
    pub fn is_classifiable(&self) -> bool {
        self.parse_confidence != ParseConfidence::Low
    }

    pub fn is_short_call(&self) -> bool {
        self.signed_quantity < 0
            && matches!(
                self.details,
                PositionDetails::Option {
                    option_type: OptionType::Call,
                    ..
                }
            )
    }

    pub fn is_short_put(&self) -> bool {
        self.signed_quantity < 0
            && matches!(
                self.details,
                PositionDetails::Option {
                    option_type: OptionType::Put,
                    ..
                }
            )
    }

    /// Share count contributed to the underlying (0 for options)
    pub fn share_count(&self) -> i64 {
        match self.details {
            PositionDetails::Stock => self.signed_quantity,
            PositionDetails::Option { .. } => 0,
        }
    }

    pub fn strike(&self) -> Option<Decimal> {
        match self.details {
            PositionDetails::Option { strike, .. } => Some(strike),
            PositionDetails::Stock => None,
        }
    }

    /// Calendar days until expiration (None for stock)
    pub fn days_to_expiration(&self, as_of: NaiveDate) -> Option<i64> {
        match self.details {
            PositionDetails::Option { expiration, .. } => Some((expiration - as_of).num_days()),
            PositionDetails::Stock => None,
        }
    }
}

/// Event types recorded in the per-lot trade ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WheelEventType {
    BuyShares,
    SellShares,
    SellPutOpen,
    SellPutClose,
    BuyPutClose,
    PutAssignment,
    SellCallOpen,
    SellCallClose,
    CallAssignment,
    Fee,
}

impl WheelEventType {
    /// Events that settle a previously opened short option
    pub fn closes_short_option(&self) -> bool {
        matches!(
            self,
            WheelEventType::SellPutClose
                | WheelEventType::BuyPutClose
                | WheelEventType::SellCallClose
                | WheelEventType::CallAssignment
                | WheelEventType::PutAssignment
        )
    }
}

/// An immutable, append-only ledger entry.
///
/// Created once when a trade is recorded; never mutated, only superseded by
/// later events referencing it via `link_event_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub id: String,
    /// Groups events for one ticker's ongoing strategy cycle
    pub cycle_id: String,
    pub event_type: WheelEventType,
    pub trade_date: NaiveDate,
    #[serde(default)]
    pub quantity_shares: Option<i64>,
    #[serde(default)]
    pub contracts: Option<i64>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub strike: Option<Decimal>,
    #[serde(default)]
    pub premium: Option<Decimal>,
    #[serde(default)]
    pub fees: Option<Decimal>,
    /// Ties a close/roll event to the open event it settles
    #[serde(default)]
    pub link_event_id: Option<String>,
}

/// How a lot's shares (or cash reservation) came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcquisitionMethod {
    PutAssignment,
    OutrightPurchase,
    CashSecuredPut,
}

impl AcquisitionMethod {
    /// Whether this acquisition path actually holds stock (vs cash collateral)
    pub fn holds_shares(&self) -> bool {
        matches!(
            self,
            AcquisitionMethod::PutAssignment | AcquisitionMethod::OutrightPurchase
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn event_type_uses_screaming_snake_wire_names() {
        let json = serde_json::to_string(&WheelEventType::BuyShares).unwrap();
        assert_eq!(json, "\"BUY_SHARES\"");

        let parsed: WheelEventType = serde_json::from_str("\"CALL_ASSIGNMENT\"").unwrap();
        assert_eq!(parsed, WheelEventType::CallAssignment);
    }

    #[test]
    fn event_deserializes_with_optional_fields_absent() {
        let json = r#"{
            "id": "evt-1",
            "cycle_id": "NVDA-2026-01",
            "event_type": "SELL_PUT_OPEN",
            "trade_date": "2026-01-05",
            "contracts": 1,
            "strike": 95.0,
            "premium": 240.0
        }"#;
        let event: WheelEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, WheelEventType::SellPutOpen);
        assert_eq!(event.strike, Some(dec!(95.0)));
        assert_eq!(event.quantity_shares, None);
        assert_eq!(event.link_event_id, None);
    }

    #[test]
    fn position_details_tag_survives_round_trip() {
        let position = Position {
            symbol: "AAPL  250620C00200000".to_string(),
            underlying: "AAPL".to_string(),
            details: PositionDetails::Option {
                option_type: OptionType::Call,
                strike: dec!(200),
                expiration: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            },
            signed_quantity: -1,
            market_value: dec!(-350),
            average_price: dec!(3.50),
            parse_confidence: ParseConfidence::High,
        };
        let json = serde_json::to_string(&position).unwrap();
        assert!(json.contains("\"kind\":\"option\""));
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, position);
    }
}
