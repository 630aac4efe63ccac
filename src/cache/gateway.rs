//! Cache Gateway
//!
//! Reads and writes full leaderboard snapshots against the injected
//! [`LeaderboardCache`], one key per (leaderboard, sort key) pair.
//!
//! Snapshots are stored as JSON arrays with a fixed expiry and are never
//! invalidated explicitly; staleness is bounded by the TTL alone.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::domain::{LeaderboardCache, LeaderboardEntry, LeaderboardId, SortKey};
use crate::error::Result;
use crate::telemetry;

/// Lifetime of a cached snapshot (5 minutes).
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for a leaderboard snapshot: `{id}:leaderboard:{sort}`.
pub fn cache_key(leaderboard_id: &LeaderboardId, sort: SortKey) -> String {
    format!("{}:leaderboard:{}", leaderboard_id, sort)
}

/// Configuration for the cache gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Expiry applied to every snapshot write
    pub ttl: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { ttl: CACHE_TTL }
    }
}

/// Snapshot cache in front of the leaderboard source.
#[derive(Clone)]
pub struct CacheGateway {
    cache: Arc<dyn LeaderboardCache>,
    config: GatewayConfig,
}

impl CacheGateway {
    /// Create a gateway with the default 300s TTL
    pub fn new(cache: Arc<dyn LeaderboardCache>) -> Self {
        Self::with_config(cache, GatewayConfig::default())
    }

    pub fn with_config(cache: Arc<dyn LeaderboardCache>, config: GatewayConfig) -> Self {
        Self { cache, config }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Load a cached snapshot.
    ///
    /// Every failure mode (backend error, empty payload, JSON `null`,
    /// undecodable payload) is reported as a miss.
    #[instrument(skip(self), fields(leaderboard_id = %leaderboard_id, sort = %sort))]
    pub async fn load(
        &self,
        leaderboard_id: &LeaderboardId,
        sort: SortKey,
    ) -> Option<Vec<LeaderboardEntry>> {
        let key = cache_key(leaderboard_id, sort);

        let raw = match self.cache.get(&key).await {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                debug!("Cache miss for {}", key);
                return None;
            }
            Err(e) => {
                warn!("Cache read failed for {}, treating as miss: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<Option<Vec<LeaderboardEntry>>>(&raw) {
            Ok(Some(entries)) => {
                debug!("Cache hit for {} ({} entries)", key, entries.len());
                Some(entries)
            }
            Ok(None) => {
                debug!("Cache holds null for {}", key);
                None
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Write a snapshot and wait for the backend to acknowledge it.
    pub async fn store(
        &self,
        leaderboard_id: &LeaderboardId,
        sort: SortKey,
        entries: &[LeaderboardEntry],
    ) -> Result<()> {
        let payload = serde_json::to_string(entries)?;
        self.cache
            .set(&cache_key(leaderboard_id, sort), payload, self.config.ttl)
            .await
    }

    /// Write a snapshot without waiting.
    ///
    /// The write runs on its own task and its outcome is discarded; failures
    /// are logged and counted only. Must be called from within a tokio runtime.
    pub fn store_detached(
        &self,
        leaderboard_id: &LeaderboardId,
        sort: SortKey,
        entries: &[LeaderboardEntry],
    ) {
        let key = cache_key(leaderboard_id, sort);
        let payload = match serde_json::to_string(entries) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode snapshot for {}: {}", key, e);
                telemetry::record_cache_write_failure();
                return;
            }
        };

        let cache = Arc::clone(&self.cache);
        let ttl = self.config.ttl;

        // Handle dropped: nobody awaits the write.
        tokio::spawn(async move {
            match cache.set(&key, payload, ttl).await {
                Ok(()) => debug!("Cached {} for {:?}", key, ttl),
                Err(e) => {
                    warn!("Cache write failed for {}: {}", key, e);
                    telemetry::record_cache_write_failure();
                }
            }
        });
    }
}

impl std::fmt::Debug for CacheGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheGateway")
            .field("ttl", &self.config.ttl)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
