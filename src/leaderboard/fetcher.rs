//! Leaderboard Fetcher
//!
//! Cache-first retrieval of full ranked snapshots. A miss fetches the complete
//! leaderboard from the source and repopulates the cache without waiting for
//! the write. Concurrent misses on the same key all hit the source; the last
//! cache write wins.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::cache::CacheGateway;
use crate::domain::{LeaderboardEntry, LeaderboardId, LeaderboardSource, SortKey};
use crate::error::Result;
use crate::pagination::Window;
use crate::telemetry;

#[derive(Clone)]
pub struct LeaderboardFetcher {
    gateway: CacheGateway,
    source: Arc<dyn LeaderboardSource>,
}

impl LeaderboardFetcher {
    pub fn new(gateway: CacheGateway, source: Arc<dyn LeaderboardSource>) -> Self {
        Self { gateway, source }
    }

    /// Full ranked leaderboard, from cache when possible.
    #[instrument(skip(self), fields(leaderboard_id = %leaderboard_id, sort = %sort))]
    pub async fn fetch_all(
        &self,
        leaderboard_id: &LeaderboardId,
        sort: SortKey,
    ) -> Result<Vec<LeaderboardEntry>> {
        if let Some(entries) = self.gateway.load(leaderboard_id, sort).await {
            telemetry::record_cache_hit();
            return Ok(entries);
        }
        telemetry::record_cache_miss();

        telemetry::record_source_fetch();
        let entries = self
            .source
            .fetch_full_leaderboard(leaderboard_id, sort)
            .await?;
        debug!("Fetched {} entries from source", entries.len());

        self.gateway.store_detached(leaderboard_id, sort, &entries);
        Ok(entries)
    }

    /// The slice of the ranked leaderboard selected by `window`.
    pub async fn fetch(
        &self,
        leaderboard_id: &LeaderboardId,
        sort: SortKey,
        window: Window,
    ) -> Result<Vec<LeaderboardEntry>> {
        let entries = self.fetch_all(leaderboard_id, sort).await?;
        Ok(window.apply(entries))
    }
}

impl std::fmt::Debug for LeaderboardFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardFetcher")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BalanceRecord, InMemoryCache, InMemoryLeaderboardSource};
    use crate::cache::cache_key;
    use crate::domain::LeaderboardCache;
    use crate::error::Error;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn source() -> Arc<InMemoryLeaderboardSource> {
        let source = InMemoryLeaderboardSource::new();
        source.insert(
            "g1".into(),
            (1..=6)
                .map(|i| BalanceRecord::new(format!("user-{i}"), 100 - i, 0))
                .collect(),
        );
        Arc::new(source)
    }

    fn fixture() -> (
        LeaderboardFetcher,
        Arc<InMemoryCache>,
        Arc<InMemoryLeaderboardSource>,
    ) {
        let cache = Arc::new(InMemoryCache::new());
        let source = source();
        let fetcher = LeaderboardFetcher::new(CacheGateway::new(cache.clone()), source.clone());
        (fetcher, cache, source)
    }

    fn user_ids(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries
            .iter()
            .map(|e| e.0["user_id"].as_str().unwrap())
            .collect()
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_miss_fetches_and_populates_cache() {
        let (fetcher, cache, source) = fixture();
        let id = LeaderboardId::new("g1");

        let entries = fetcher.fetch_all(&id, SortKey::Cash).await.unwrap();
        assert_eq!(entries.len(), 6);
        assert_eq!(source.full_fetch_count(), 1);

        settle().await;
        let cached = cache.get(&cache_key(&id, SortKey::Cash)).await.unwrap();
        let cached: Vec<LeaderboardEntry> = serde_json::from_str(&cached.unwrap()).unwrap();
        assert_eq!(cached, entries);
    }

    #[tokio::test]
    async fn test_second_fetch_is_cache_hit() {
        let (fetcher, _cache, source) = fixture();
        let id = LeaderboardId::new("g1");

        let first = fetcher.fetch_all(&id, SortKey::Total).await.unwrap();
        settle().await;
        let second = fetcher.fetch_all(&id, SortKey::Total).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.full_fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_hit_serves_stale_snapshot() {
        let (fetcher, cache, source) = fixture();
        let id = LeaderboardId::new("g1");

        let stale = vec![LeaderboardEntry::new(serde_json::json!({"user_id": "ghost"}))];
        cache
            .set(
                &cache_key(&id, SortKey::Total),
                serde_json::to_string(&stale).unwrap(),
                Duration::from_secs(300),
            )
            .await
            .unwrap();

        let entries = fetcher.fetch_all(&id, SortKey::Total).await.unwrap();
        assert_eq!(entries, stale);
        assert_eq!(source.full_fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_through() {
        let (fetcher, cache, source) = fixture();
        let id = LeaderboardId::new("g1");
        cache
            .set(&cache_key(&id, SortKey::Total), "{oops".into(), Duration::from_secs(300))
            .await
            .unwrap();

        let entries = fetcher.fetch_all(&id, SortKey::Total).await.unwrap();
        assert_eq!(entries.len(), 6);
        assert_eq!(source.full_fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_window_applied_after_fetch() {
        let (fetcher, _cache, _source) = fixture();
        let id = LeaderboardId::new("g1");

        let entries = fetcher
            .fetch(&id, SortKey::Cash, Window::new(3, 2))
            .await
            .unwrap();
        assert_eq!(user_ids(&entries), ["user-3", "user-4"]);

        let entries = fetcher
            .fetch(&id, SortKey::Cash, Window::new(1, 0))
            .await
            .unwrap();
        assert_eq!(entries.len(), 6);
    }

    #[tokio::test]
    async fn test_empty_leaderboard_is_empty_vec() {
        let (fetcher, _cache, _source) = fixture();
        let entries = fetcher
            .fetch(&"nobody".into(), SortKey::Total, Window::new(0, 25))
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let (fetcher, _cache, source) = fixture();
        source.set_unavailable(true);

        let result = fetcher.fetch_all(&"g1".into(), SortKey::Total).await;
        assert_matches!(result, Err(Error::Source(_)));
    }
}
