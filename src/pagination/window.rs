//! Concrete slice of a ranked leaderboard.

/// Resolved (offset, limit) window.
///
/// The offset is one-based: an offset of `n > 0` drops the first `n - 1`
/// entries, so offsets 0 and 1 both start at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    /// Maximum entries to keep; `None` keeps everything after the offset
    pub limit: Option<usize>,
}

impl Window {
    pub fn new(offset: u64, limit: i64) -> Self {
        Self {
            offset,
            limit: positive_limit(limit),
        }
    }

    /// The whole leaderboard.
    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    /// Number of leading entries the offset drops.
    pub fn skip(&self) -> usize {
        match self.offset {
            0 => 0,
            n => usize::try_from(n - 1).unwrap_or(usize::MAX),
        }
    }

    /// Slice `entries` down to this window.
    pub fn apply<T>(&self, mut entries: Vec<T>) -> Vec<T> {
        let skip = self.skip().min(entries.len());
        entries.drain(..skip);

        if let Some(limit) = self.limit {
            entries.truncate(limit);
        }
        entries
    }
}

/// Non-positive limits mean "no limit".
fn positive_limit(limit: i64) -> Option<usize> {
    if limit > 0 {
        Some(usize::try_from(limit).unwrap_or(usize::MAX))
    } else {
        None
    }
}
