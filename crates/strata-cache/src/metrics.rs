//! Prometheus metrics for cache monitoring.

use metrics::{counter, describe_counter};

/// Metric names for the cache layer.
pub mod names {
    /// Total cache hits.
    pub const CACHE_HITS_TOTAL: &str = "strata_cache_hits_total";
    /// Total cache misses.
    pub const CACHE_MISSES_TOTAL: &str = "strata_cache_misses_total";
    /// Total values written.
    pub const CACHE_WRITES_TOTAL: &str = "strata_cache_writes_total";
    /// Total single-key deletes.
    pub const CACHE_DELETES_TOTAL: &str = "strata_cache_deletes_total";
    /// Total keys removed by bulk invalidation.
    pub const CACHE_INVALIDATED_KEYS_TOTAL: &str = "strata_cache_invalidated_keys_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Total number of cache misses");
    describe_counter!(names::CACHE_WRITES_TOTAL, "Total number of values written");
    describe_counter!(
        names::CACHE_DELETES_TOTAL,
        "Total number of single-key deletes"
    );
    describe_counter!(
        names::CACHE_INVALIDATED_KEYS_TOTAL,
        "Total number of keys removed by bulk invalidation"
    );
}

/// Cache metrics recorder, labeled by cache flavor.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a cache hit.
    pub fn hit(flavor: &'static str) {
        counter!(names::CACHE_HITS_TOTAL, "flavor" => flavor).increment(1);
    }

    /// Record a cache miss.
    pub fn miss(flavor: &'static str) {
        counter!(names::CACHE_MISSES_TOTAL, "flavor" => flavor).increment(1);
    }

    /// Record a value written.
    pub fn write(flavor: &'static str) {
        counter!(names::CACHE_WRITES_TOTAL, "flavor" => flavor).increment(1);
    }

    /// Record a single-key delete.
    pub fn delete(flavor: &'static str) {
        counter!(names::CACHE_DELETES_TOTAL, "flavor" => flavor).increment(1);
    }

    /// Record keys removed by one bulk invalidation pass.
    pub fn invalidated(flavor: &'static str, count: u64) {
        counter!(names::CACHE_INVALIDATED_KEYS_TOTAL, "flavor" => flavor).increment(count);
    }
}
