//! Lookup metrics.
//!
//! Tracks how often a store answered a key with a translation versus
//! falling back to the key itself. Counters are atomic so lookups stay `&self`.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Hit/miss counters for one translation store.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Number of lookups answered from a dictionary
    hits: AtomicUsize,

    /// Number of lookups that fell back to the key
    misses: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup answered from a dictionary.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that fell back to the key.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let misses = self.misses();
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            misses,
            hit_rate,
        }
    }

    /// Reset all counters to zero.
    #[cfg(test)]
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of lookup statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of lookups answered from a dictionary
    pub hits: usize,

    /// Number of lookups that fell back to the key
    pub misses: usize,

    /// Hit rate as a percentage (0-100)
    pub hit_rate: f64,
}
