//! Short-TTL memoization in front of the fetch + normalize boundary.
//!
//! The cache is an explicit, session-owned object (no process-wide
//! singleton): hosts serving multiple accounts create one per session. The
//! clock is injected so staleness is testable without sleeping. All state
//! lives behind one mutex, so the read-check-refetch-overwrite sequence is
//! atomic and two concurrent refreshes cannot leave a stale result visible.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tracing::debug;
use wheel_core::types::Position;

use crate::normalizer::normalize_positions;
use crate::source::PositionSource;

/// Default cache lifetime
pub const DEFAULT_TTL_SECS: i64 = 300; // 5 minutes

struct CacheEntry {
    positions: Vec<Position>,
    cached_at: DateTime<Utc>,
}

/// Time-boxed position snapshot cache.
pub struct PositionCache {
    ttl_secs: i64,
    clock: fn() -> DateTime<Utc>,
    entry: Mutex<Option<CacheEntry>>,
}

impl Default for PositionCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS)
    }
}

impl PositionCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl_secs,
            clock: Utc::now,
            entry: Mutex::new(None),
        }
    }

    /// Override the clock (tests inject a controllable one)
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Return the cached snapshot when fresh, else fetch from the source,
    /// normalize, and atomically replace the cache.
    pub fn get(&self, source: &dyn PositionSource, force_refresh: bool) -> Result<Vec<Position>> {
        let now = (self.clock)();
        let mut guard = self
            .entry
            .lock()
            .map_err(|_| anyhow!("position cache lock poisoned"))?;

        if !force_refresh {
            if let Some(entry) = guard.as_ref() {
                let age = (now - entry.cached_at).num_seconds();
                if age < self.ttl_secs {
                    debug!(age_secs = age, "position cache hit");
                    return Ok(entry.positions.clone());
                }
            }
        }

        debug!(source = source.source_name(), "refreshing position cache");
        let raw = source.fetch_raw()?;
        let positions = normalize_positions(&raw);
        *guard = Some(CacheEntry {
            positions: positions.clone(),
            cached_at: now,
        });
        Ok(positions)
    }

    /// Clear unconditionally (used on disconnect).
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.entry.lock() {
            *guard = None;
        }
    }
}
