//! Infrastructure Adapters
//!
//! Adapter implementations for the domain ports, following the Port/Adapter
//! (Hexagonal) architecture pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Domain Layer                              │
//! │  ┌────────────────────────────────────────────────────────────┐ │
//! │  │          LeaderboardCache  │  LeaderboardSource            │ │
//! │  └────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters (This Module)                       │
//! │  ┌────────────────────────────────────────────────────────────┐ │
//! │  │       InMemoryCache  │  InMemoryLeaderboardSource          │ │
//! │  └────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use leaderboards::adapters::{InMemoryCache, InMemoryLeaderboardSource};
//!
//! let cache = Arc::new(InMemoryCache::new());
//! let source = Arc::new(InMemoryLeaderboardSource::from_seed_file("seed.json")?);
//! let service = LeaderboardService::new(cache, source);
//! ```

mod memory_cache;
mod memory_source;

pub use memory_cache::{CacheStats, InMemoryCache};
pub use memory_source::{BalanceRecord, InMemoryLeaderboardSource};
