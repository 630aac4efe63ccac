//! Snapshot cache in front of the leaderboard source.
//!
//! - [`CacheGateway`] - key derivation, JSON encoding and fire-and-forget
//!   writes against any [`LeaderboardCache`](crate::domain::LeaderboardCache)

mod gateway;

pub use gateway::{cache_key, CacheGateway, GatewayConfig, CACHE_TTL};
