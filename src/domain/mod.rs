//! Domain Layer
//!
//! Value objects shared by every component and the ports the core depends on.
//!
//! # Usage
//!
//! ```ignore
//! use leaderboards::domain::{LeaderboardCache, LeaderboardSource, SortKey};
//!
//! async fn warm<C, S>(cache: &C, source: &S, id: &LeaderboardId) -> Result<()>
//! where
//!     C: LeaderboardCache,
//!     S: LeaderboardSource,
//! {
//!     let entries = source.fetch_full_leaderboard(id, SortKey::Total).await?;
//!     // ...
//! }
//! ```

pub mod ports;

pub use ports::{
    // Port traits
    LeaderboardCache,
    // Value objects
    LeaderboardEntry,
    LeaderboardId,
    LeaderboardSource,
    PageResult,
    SortKey,
};
