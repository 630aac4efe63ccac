//! Pagination Resolver
//!
//! Turns a [`PageRequest`] into a concrete [`Window`].
//!
//! # Modes
//!
//! - **Paging** (`page` supplied): the limit defaults to 1000 and the source
//!   is asked how many pages of that size exist. Zero or unknown page counts
//!   short-circuit to an empty result that reports the count. Otherwise the
//!   page is clamped into range and converted to an offset, unless the caller
//!   gave an explicit offset.
//! - **Offset**: offset defaults to 0, limit defaults to and is capped at 25.
//!
//! `total_pages` is only reported by the short circuit. A normal paging
//! response carries `null`, exactly like offset mode.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::request::{PageRequest, PaginationMode, OFFSET_MODE_LIMIT, PAGING_MODE_LIMIT};
use super::window::Window;
use crate::domain::{LeaderboardId, LeaderboardSource, PageResult, SortKey};
use crate::error::Result;

/// Outcome of resolving a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Nothing to fetch; return this result as-is.
    Empty(PageResult),
    /// Fetch the ranked leaderboard and slice it.
    Fetch {
        window: Window,
        sort: SortKey,
        /// Page echoed back to the caller
        page: Option<i64>,
    },
}

/// Resolves request windows, consulting the source for page counts.
#[derive(Clone)]
pub struct PaginationResolver {
    source: Arc<dyn LeaderboardSource>,
}

impl PaginationResolver {
    pub fn new(source: Arc<dyn LeaderboardSource>) -> Self {
        Self { source }
    }

    #[instrument(skip(self, request), fields(leaderboard_id = %leaderboard_id, mode = %request.mode()))]
    pub async fn resolve(
        &self,
        leaderboard_id: &LeaderboardId,
        request: &PageRequest,
    ) -> Result<Resolution> {
        match request.mode() {
            PaginationMode::Offset => Ok(resolve_offset_mode(request)),
            PaginationMode::Paging => self.resolve_paging_mode(leaderboard_id, request).await,
        }
    }

    async fn resolve_paging_mode(
        &self,
        leaderboard_id: &LeaderboardId,
        request: &PageRequest,
    ) -> Result<Resolution> {
        let page = request.page.unwrap_or(1);
        let limit = request.limit.unwrap_or(PAGING_MODE_LIMIT);

        let total_pages = self.source.total_pages(leaderboard_id, limit).await?;
        let total = match total_pages {
            Some(total) if total > 0 => total,
            _ => {
                debug!(
                    "No pages for {} at size {}: {:?}",
                    leaderboard_id, limit, total_pages
                );
                return Ok(Resolution::Empty(PageResult::empty(Some(page), total_pages)));
            }
        };

        let (page, offset) = if request.offset_supplied {
            (page, request.offset.unwrap_or(0))
        } else {
            let page = clamp_page(page, total);
            (page, page_offset(page, limit))
        };

        debug!(
            "Resolved page {} of {} to offset {} limit {}",
            page, total, offset, limit
        );
        Ok(Resolution::Fetch {
            window: Window::new(offset, limit),
            sort: request.sort,
            page: Some(page),
        })
    }
}

impl std::fmt::Debug for PaginationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationResolver").finish_non_exhaustive()
    }
}

/// Offset mode needs no source round-trip.
pub fn resolve_offset_mode(request: &PageRequest) -> Resolution {
    let limit = match request.limit {
        Some(limit) if limit > 0 && limit <= OFFSET_MODE_LIMIT => limit,
        _ => OFFSET_MODE_LIMIT,
    };

    Resolution::Fetch {
        window: Window::new(request.offset.unwrap_or(0), limit),
        sort: request.sort,
        page: request.page,
    }
}

/// Clamp a page number into `[1, total_pages]`.
pub fn clamp_page(page: i64, total_pages: u64) -> i64 {
    let last = i64::try_from(total_pages).unwrap_or(i64::MAX).max(1);
    page.clamp(1, last)
}

/// Offset of the first entry of `page`: `max(0, (page - 1) * limit)`.
pub fn page_offset(page: i64, limit: i64) -> u64 {
    let offset = page.saturating_sub(1).saturating_mul(limit);
    u64::try_from(offset).unwrap_or(0)
}

// =============================================================================
// Tests
// =============================================================================
