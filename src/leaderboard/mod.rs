//! Leaderboard read path
//!
//! - [`LeaderboardFetcher`] - cache-or-source retrieval of ranked snapshots
//! - [`LeaderboardService`] - query → window → slice, the caller-facing entry point

mod fetcher;
mod service;

pub use fetcher::LeaderboardFetcher;
pub use service::LeaderboardService;
