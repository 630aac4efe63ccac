//! In-Memory Cache Adapter
//!
//! Implements the `LeaderboardCache` port with a `DashMap` and per-entry
//! deadlines. Stands in for an external key-value store in single-process
//! deployments and tests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;

use crate::domain::LeaderboardCache;
use crate::error::Result;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Instant,
}

impl StoredValue {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Process-local cache with expiry on read.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: DashMap<String, StoredValue>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry regardless of expiry
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove entries whose deadline has passed, returning how many went.
    pub fn purge_expired(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, stored| {
            let keep = !stored.is_expired();
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Counts taken in one pass; writers may race with it.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            total_entries: 0,
            expired_entries: 0,
            active_entries: 0,
        };
        for entry in self.entries.iter() {
            stats.total_entries += 1;
            if entry.is_expired() {
                stats.expired_entries += 1;
            } else {
                stats.active_entries += 1;
            }
        }
        stats
    }
}

#[async_trait]
impl LeaderboardCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let hit = match self.entries.get(key) {
            Some(stored) if !stored.is_expired() => return Ok(Some(stored.value.clone())),
            Some(_) => true,
            None => false,
        };

        if hit {
            // Expired; the read guard is released above
            self.entries.remove_if(key, |_, stored| stored.is_expired());
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            StoredValue {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}
