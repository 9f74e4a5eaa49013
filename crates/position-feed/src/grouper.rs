//! Partition normalized positions by underlying ticker.

use std::collections::HashMap;

use wheel_core::types::Position;

/// Group positions by resolved underlying, preserving first-seen ticker
/// order. Stable ordering here backs the detector's tie-breaking contract.
pub fn group_by_underlying(positions: Vec<Position>) -> Vec<(String, Vec<Position>)> {
    let mut groups: Vec<(String, Vec<Position>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for position in positions {
        match index.get(&position.underlying) {
            Some(&i) => groups[i].1.push(position),
            None => {
                index.insert(position.underlying.clone(), groups.len());
                let ticker = position.underlying.clone();
                groups.push((ticker, vec![position]));
            }
        }
    }

    groups
}
