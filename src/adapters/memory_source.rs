//! In-Memory Leaderboard Source Adapter
//!
//! Implements the `LeaderboardSource` port over balances held in process,
//! optionally seeded from a JSON file of the form
//! `{ "<leaderboard id>": [ { "user_id": "...", "cash": 0, "bank": 0 } ] }`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{LeaderboardEntry, LeaderboardId, LeaderboardSource, SortKey};
use crate::error::{Error, Result};

/// One participant's balances in a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub user_id: String,
    #[serde(default)]
    pub cash: i64,
    #[serde(default)]
    pub bank: i64,
}

impl BalanceRecord {
    pub fn new(user_id: impl Into<String>, cash: i64, bank: i64) -> Self {
        Self {
            user_id: user_id.into(),
            cash,
            bank,
        }
    }

    pub fn total(&self) -> i64 {
        self.cash.saturating_add(self.bank)
    }

    fn sort_value(&self, sort: SortKey) -> i64 {
        match sort {
            SortKey::Total => self.total(),
            SortKey::Cash => self.cash,
            SortKey::Bank => self.bank,
        }
    }

    fn to_entry(&self) -> LeaderboardEntry {
        LeaderboardEntry::new(serde_json::json!({
            "user_id": self.user_id,
            "cash": self.cash,
            "bank": self.bank,
            "total": self.total(),
        }))
    }
}

/// Balance store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryLeaderboardSource {
    boards: RwLock<HashMap<LeaderboardId, Vec<BalanceRecord>>>,
    unavailable: AtomicBool,
    full_fetches: AtomicU64,
    page_count_queries: AtomicU64,
}

impl InMemoryLeaderboardSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load balances from a seed file.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let source = Self::from_seed_json(&raw)?;
        info!(
            "Loaded {} leaderboards from {}",
            source.boards.read().len(),
            path.display()
        );
        Ok(source)
    }

    pub fn from_seed_json(raw: &str) -> Result<Self> {
        let seed: HashMap<String, Vec<BalanceRecord>> = serde_json::from_str(raw)?;
        let source = Self::new();
        for (id, records) in seed {
            source.insert(LeaderboardId::new(id), records);
        }
        Ok(source)
    }

    /// Replace the balances of one leaderboard.
    pub fn insert(&self, leaderboard_id: LeaderboardId, records: Vec<BalanceRecord>) {
        self.boards.write().insert(leaderboard_id, records);
    }

    /// Make every call fail, simulating an unreachable store.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    pub fn full_fetch_count(&self) -> u64 {
        self.full_fetches.load(Ordering::Relaxed)
    }

    pub fn page_count_queries(&self) -> u64 {
        self.page_count_queries.load(Ordering::Relaxed)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(Error::Source("balance store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl LeaderboardSource for InMemoryLeaderboardSource {
    async fn fetch_full_leaderboard(
        &self,
        leaderboard_id: &LeaderboardId,
        sort: SortKey,
    ) -> Result<Vec<LeaderboardEntry>> {
        self.full_fetches.fetch_add(1, Ordering::Relaxed);
        self.check_available()?;

        let mut records = self
            .boards
            .read()
            .get(leaderboard_id)
            .cloned()
            .unwrap_or_default();

        records.sort_by(|a, b| {
            b.sort_value(sort)
                .cmp(&a.sort_value(sort))
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        debug!(
            "Ranked {} balances for {} by {}",
            records.len(),
            leaderboard_id,
            sort
        );
        Ok(records.iter().map(BalanceRecord::to_entry).collect())
    }

    async fn total_pages(
        &self,
        leaderboard_id: &LeaderboardId,
        page_size: i64,
    ) -> Result<Option<u64>> {
        self.page_count_queries.fetch_add(1, Ordering::Relaxed);
        self.check_available()?;

        if page_size <= 0 {
            return Ok(None);
        }

        let count = self
            .boards
            .read()
            .get(leaderboard_id)
            .map_or(0, |records| records.len() as u64);
        Ok(Some(count.div_ceil(page_size as u64)))
    }
}
