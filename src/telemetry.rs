//! Prometheus counters for the leaderboard read path.
//!
//! Registered lazily in the default registry so the `/metrics` endpoint
//! picks them up through `prometheus::gather()`.

use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};
use prometheus::{Encoder, TextEncoder};

use crate::error::{Error, Result};

// Metric names and label sets are constants; registration only fails on a
// duplicate name, which would be a programming error.
static CACHE_HITS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "leaderboard_cache_hits_total",
        "Leaderboard snapshots served from cache"
    )
    .expect("register leaderboard_cache_hits_total")
});

static CACHE_MISSES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "leaderboard_cache_misses_total",
        "Leaderboard lookups that fell through to the source"
    )
    .expect("register leaderboard_cache_misses_total")
});

static CACHE_WRITE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "leaderboard_cache_write_failures_total",
        "Discarded cache writes that failed"
    )
    .expect("register leaderboard_cache_write_failures_total")
});

static SOURCE_FETCHES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "leaderboard_source_fetches_total",
        "Full leaderboard fetches issued to the source"
    )
    .expect("register leaderboard_source_fetches_total")
});

static REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "leaderboard_requests_total",
        "Leaderboard requests by pagination mode",
        &["mode"]
    )
    .expect("register leaderboard_requests_total")
});

pub fn record_cache_hit() {
    CACHE_HITS.inc();
}

pub fn record_cache_miss() {
    CACHE_MISSES.inc();
}

pub fn record_cache_write_failure() {
    CACHE_WRITE_FAILURES.inc();
}

#[cfg(test)]
pub(crate) fn cache_write_failures() -> u64 {
    CACHE_WRITE_FAILURES.get()
}

pub fn record_source_fetch() {
    SOURCE_FETCHES.inc();
}

pub fn record_request(mode: &str) {
    REQUESTS.with_label_values(&[mode]).inc();
}

/// Render every registered metric in the Prometheus text format
/// ([`prometheus::TEXT_FORMAT`]).
pub fn gather_text() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| Error::Internal(format!("Failed to encode metrics: {}", e)))?;
    Ok(buffer)
}
