pub mod cache;
pub mod grouper;
pub mod normalizer;
pub mod source;

pub use cache::PositionCache;
pub use grouper::group_by_underlying;
pub use normalizer::{normalize_position, normalize_positions};
pub use source::{PositionSource, RawPosition};
