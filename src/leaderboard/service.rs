//! Leaderboard Service
//!
//! The single read operation callers use: parse the query, resolve the
//! window, fetch and slice.

use std::sync::Arc;

use tracing::{debug, field, instrument, Span};

use super::fetcher::LeaderboardFetcher;
use crate::cache::{CacheGateway, GatewayConfig};
use crate::domain::{LeaderboardCache, LeaderboardId, LeaderboardSource, PageResult};
use crate::error::Result;
use crate::pagination::{PageRequest, PaginationResolver, RawQuery, Resolution};
use crate::telemetry;

#[derive(Debug, Clone)]
pub struct LeaderboardService {
    resolver: PaginationResolver,
    fetcher: LeaderboardFetcher,
}

impl LeaderboardService {
    /// Wire the service over already-connected collaborators.
    pub fn new(cache: Arc<dyn LeaderboardCache>, source: Arc<dyn LeaderboardSource>) -> Self {
        Self::with_config(cache, source, GatewayConfig::default())
    }

    pub fn with_config(
        cache: Arc<dyn LeaderboardCache>,
        source: Arc<dyn LeaderboardSource>,
        config: GatewayConfig,
    ) -> Self {
        let gateway = CacheGateway::with_config(cache, config);
        Self {
            resolver: PaginationResolver::new(Arc::clone(&source)),
            fetcher: LeaderboardFetcher::new(gateway, source),
        }
    }

    /// Serve one page of a leaderboard.
    ///
    /// Only source failures are returned as errors; malformed queries and
    /// cache trouble degrade to defaults and misses.
    #[instrument(
        skip(self, query),
        fields(leaderboard_id = %leaderboard_id, mode = field::Empty, sort = field::Empty)
    )]
    pub async fn get_leaderboard(
        &self,
        leaderboard_id: &LeaderboardId,
        query: &RawQuery,
    ) -> Result<PageResult> {
        let request = PageRequest::parse(query);
        let mode = request.mode();

        let span = Span::current();
        span.record("mode", mode.as_str());
        span.record("sort", request.sort.as_str());
        telemetry::record_request(mode.as_str());

        match self.resolver.resolve(leaderboard_id, &request).await? {
            Resolution::Empty(result) => Ok(result),
            Resolution::Fetch { window, sort, page } => {
                let entries = self.fetcher.fetch(leaderboard_id, sort, window).await?;
                debug!("Serving {} entries ({:?})", entries.len(), window);
                Ok(PageResult::new(entries, page))
            }
        }
    }
}
