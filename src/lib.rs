//! Leaderboards - cached, paginated rankings for a virtual-currency economy
//!
//! Serves leaderboard pages from full ranked snapshots held in a time-boxed
//! cache, falling back to the balance store on a miss.
//!
//! # Architecture
//!
//! ```text
//! RawQuery → Pagination Resolver → Leaderboard Fetcher → PageResult
//!                   │                  │          │
//!           total_pages (paging)   Cache Gateway  Leaderboard Source
//! ```
//!
//! Snapshots are cached per (leaderboard, sort key) for 300 seconds and never
//! invalidated explicitly; staleness is bounded by that TTL.
//!
//! # Modules
//!
//! - [`adapters`] - In-memory implementations of the domain ports
//! - [`cache`] - Cache gateway: key derivation and snapshot encoding
//! - [`domain`] - Value objects and ports
//! - [`error`] - Error types
//! - [`leaderboard`] - Fetcher and caller-facing service
//! - [`pagination`] - Query parsing and window resolution
//! - [`server`] - HTTP surface
//! - [`telemetry`] - Prometheus counters

pub mod adapters;
pub mod cache;
pub mod domain;
pub mod error;
pub mod leaderboard;
pub mod pagination;
pub mod server;
pub mod telemetry;

// Re-export commonly used types
pub use domain::{LeaderboardEntry, LeaderboardId, PageResult, SortKey};
pub use error::{Error, Result};
pub use leaderboard::LeaderboardService;
pub use pagination::RawQuery;
