//! Process-local cache statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Latency avoided by one cross-user hit, in milliseconds
pub const LATENCY_SAVED_PER_CROSS_USER_HIT_MS: u64 = 2_000;

/// Provider cost avoided by one cross-user hit, in USD
pub const COST_SAVED_PER_CROSS_USER_HIT_USD: f64 = 0.002;

/// Snapshot of the running counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub cross_user_hits: u64,
    pub access_denials: u64,
    pub stores: u64,
    pub store_failures: u64,
    /// Mean similarity of accepted hits
    pub avg_similarity: f32,
    pub hit_rate: f32,
    pub estimated_latency_saved_ms: u64,
    pub estimated_cost_saved_usd: f64,
    pub ready: bool,
}

#[derive(Debug, Default)]
struct RunningMean {
    count: u64,
    mean: f64,
}

/// Running counters owned by one cache instance
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    cross_user_hits: AtomicU64,
    access_denials: AtomicU64,
    stores: AtomicU64,
    store_failures: AtomicU64,
    similarity: Mutex<RunningMean>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self, similarity: f32, cross_user: bool) {
        self.hits.fetch_add(1, Ordering::Relaxed);

        if cross_user {
            self.cross_user_hits.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut running) = self.similarity.lock() {
            running.count += 1;
            running.mean += (f64::from(similarity) - running.mean) / running.count as f64;
        }
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A denied cross-user candidate; also counted as a miss
    pub fn record_access_denial(&self) {
        self.access_denials.fetch_add(1, Ordering::Relaxed);
        self.record_miss();
    }

    pub fn record_store(&self, success: bool) {
        if success {
            self.stores.fetch_add(1, Ordering::Relaxed);
        } else {
            self.store_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.cross_user_hits.store(0, Ordering::Relaxed);
        self.access_denials.store(0, Ordering::Relaxed);
        self.stores.store(0, Ordering::Relaxed);
        self.store_failures.store(0, Ordering::Relaxed);

        if let Ok(mut running) = self.similarity.lock() {
            *running = RunningMean::default();
        }
    }

    pub fn snapshot(&self, ready: bool) -> ToolCacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let cross_user_hits = self.cross_user_hits.load(Ordering::Relaxed);
        let total = hits + misses;

        let avg_similarity = self
            .similarity
            .lock()
            .map(|running| running.mean as f32)
            .unwrap_or_default();

        ToolCacheStats {
            hits,
            misses,
            cross_user_hits,
            access_denials: self.access_denials.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            avg_similarity,
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f32 / total as f32
            },
            estimated_latency_saved_ms: cross_user_hits * LATENCY_SAVED_PER_CROSS_USER_HIT_MS,
            estimated_cost_saved_usd: cross_user_hits as f64 * COST_SAVED_PER_CROSS_USER_HIT_USD,
            ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let stats = StatsRecorder::new().snapshot(false);

        assert_eq!(stats, ToolCacheStats::default());
    }

    #[test]
    fn test_running_mean_and_savings() {
        let recorder = StatsRecorder::new();
        recorder.record_hit(0.92, false);
        recorder.record_hit(0.98, true);
        recorder.record_hit(0.95, true);
        recorder.record_miss();

        let stats = recorder.snapshot(true);
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.cross_user_hits, 2);
        assert!((stats.avg_similarity - 0.95).abs() < 1e-5);
        assert!((stats.hit_rate - 0.75).abs() < f32::EPSILON);
        assert_eq!(stats.estimated_latency_saved_ms, 4_000);
        assert!((stats.estimated_cost_saved_usd - 0.004).abs() < 1e-12);
        assert!(stats.ready);
    }

    #[test]
    fn test_denial_counts_as_miss() {
        let recorder = StatsRecorder::new();
        recorder.record_access_denial();

        let stats = recorder.snapshot(true);
        assert_eq!(stats.access_denials, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[test]
    fn test_reset() {
        let recorder = StatsRecorder::new();
        recorder.record_hit(0.99, true);
        recorder.record_store(true);
        recorder.record_store(false);
        recorder.reset();

        let stats = recorder.snapshot(true);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.stores, 0);
        assert_eq!(stats.store_failures, 0);
        assert_eq!(stats.avg_similarity, 0.0);
    }
}
