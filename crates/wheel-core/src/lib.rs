pub mod error;
pub mod symbols;
pub mod types;

pub use error::WheelError;
pub use symbols::{format_option_symbol, parse_option_symbol, ParsedSymbol};
pub use types::*;
