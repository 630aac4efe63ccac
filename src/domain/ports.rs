//! Domain Ports (Port/Adapter Pattern)
//!
//! Core value objects and the abstractions (ports) the leaderboard core
//! depends on. Infrastructure adapters implement these traits; the core only
//! sees them as injected trait objects.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Domain Layer                            │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │                    Ports (Traits)                    │    │
//! │  │        LeaderboardCache  │  LeaderboardSource        │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Infrastructure Layer                       │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │                  Adapters (Impls)                    │    │
//! │  │    InMemoryCache  │  InMemoryLeaderboardSource       │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// =============================================================================
// Value Objects
// =============================================================================

/// Leaderboard identifier (value object).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeaderboardId(pub String);

impl LeaderboardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LeaderboardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LeaderboardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LeaderboardId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Balance field a leaderboard is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Total,
    Cash,
    Bank,
}

impl SortKey {
    /// Exact, case-sensitive lookup. Anything unrecognized (or absent) is `Total`.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("cash") => SortKey::Cash,
            Some("bank") => SortKey::Bank,
            _ => SortKey::Total,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Total => "total",
            SortKey::Cash => "cash",
            SortKey::Bank => "bank",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One participant's balance record.
///
/// Opaque to the core: it is ordered by the source and sliced by the fetcher,
/// never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaderboardEntry(pub serde_json::Value);

impl LeaderboardEntry {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

/// The bounded slice returned to callers.
///
/// `total_pages` is only ever populated when paging mode short-circuits on a
/// zero or missing page count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    #[serde(rename = "balances")]
    pub entries: Vec<LeaderboardEntry>,
    pub page: Option<i64>,
    pub total_pages: Option<u64>,
}

impl PageResult {
    pub fn new(entries: Vec<LeaderboardEntry>, page: Option<i64>) -> Self {
        Self {
            entries,
            page,
            total_pages: None,
        }
    }

    /// Empty result carrying the page count the source reported.
    pub fn empty(page: Option<i64>, total_pages: Option<u64>) -> Self {
        Self {
            entries: Vec::new(),
            page,
            total_pages,
        }
    }
}

// =============================================================================
// Cache Port
// =============================================================================

/// Port for a string key-value cache with per-key expiry.
///
/// Connection management belongs to the implementation; the core receives an
/// already-connected instance.
///
/// # Example
///
/// ```ignore
/// struct RedisCache { /* ... */ }
///
/// #[async_trait]
/// impl LeaderboardCache for RedisCache {
///     async fn get(&self, key: &str) -> Result<Option<String>> {
///         // GET key
///     }
///     async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
///         // SET key value EX ttl
///     }
/// }
/// ```
#[async_trait]
pub trait LeaderboardCache: Send + Sync {
    /// Fetch the raw value stored under `key`, if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

// =============================================================================
// Leaderboard Source Port
// =============================================================================

/// Port for the persistent balance store.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Complete leaderboard, ranked by `sort`. Never windowed.
    async fn fetch_full_leaderboard(
        &self,
        leaderboard_id: &LeaderboardId,
        sort: SortKey,
    ) -> Result<Vec<LeaderboardEntry>>;

    /// Number of pages of `page_size` entries, or `None` when the store has
    /// no answer for that size.
    async fn total_pages(&self, leaderboard_id: &LeaderboardId, page_size: i64)
        -> Result<Option<u64>>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_key_exact_match() {
        assert_eq!(SortKey::from_query(Some("total")), SortKey::Total);
        assert_eq!(SortKey::from_query(Some("cash")), SortKey::Cash);
        assert_eq!(SortKey::from_query(Some("bank")), SortKey::Bank);
    }

    #[test]
    fn test_sort_key_fallback() {
        assert_eq!(SortKey::from_query(None), SortKey::Total);
        assert_eq!(SortKey::from_query(Some("xyz")), SortKey::Total);
        assert_eq!(SortKey::from_query(Some("")), SortKey::Total);
        // Case-sensitive
        assert_eq!(SortKey::from_query(Some("CASH")), SortKey::Total);
        assert_eq!(SortKey::from_query(Some(" bank")), SortKey::Total);
    }

    #[test]
    fn test_sort_key_display() {
        assert_eq!(SortKey::Total.to_string(), "total");
        assert_eq!(SortKey::Cash.to_string(), "cash");
        assert_eq!(SortKey::Bank.to_string(), "bank");
        assert_eq!(SortKey::default(), SortKey::Total);
    }

    #[test]
    fn test_leaderboard_id() {
        let id = LeaderboardId::new("guild-42");
        assert_eq!(id.as_str(), "guild-42");
        assert_eq!(id.to_string(), "guild-42");
        assert_eq!(LeaderboardId::from("guild-42"), id);
    }

    #[test]
    fn test_entry_is_transparent() {
        let entry = LeaderboardEntry::new(json!({"user_id": "u1", "cash": 5}));
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"cash":5,"user_id":"u1"}"#);

        let back: LeaderboardEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_page_result_serializes_wire_shape() {
        let result = PageResult::empty(Some(1), Some(0));
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"balances":[],"page":1,"total_pages":0}"#);

        let result = PageResult::new(vec![LeaderboardEntry::new(json!(1))], None);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"balances":[1],"page":null,"total_pages":null}"#);
    }
}
