//! Pagination
//!
//! Converts a caller's page/offset/limit/sort query into a concrete window
//! over a ranked leaderboard.
//!
//! ```text
//! RawQuery ──parse──▶ PageRequest ──resolve──▶ Resolution
//!                                     │            ├─ Empty(PageResult)
//!                          total_pages (paging)    └─ Fetch { Window, SortKey, page }
//! ```
//!
//! # Components
//!
//! - **Request** (`request.rs`): one parse-or-default function per field,
//!   producing a typed [`PageRequest`].
//! - **Resolver** (`resolver.rs`): paging/offset mode selection, page
//!   clamping and offset math.
//! - **Window** (`window.rs`): the one-based offset and limit applied to the
//!   ranked snapshot.

mod request;
mod resolver;
mod window;

#[cfg(test)]
mod proptest;

pub use request::{
    parse_leading_int, parse_limit, parse_offset, parse_page, parse_sort, PageRequest,
    PaginationMode, RawQuery, OFFSET_MODE_LIMIT, PAGING_MODE_LIMIT,
};
pub use resolver::{clamp_page, page_offset, resolve_offset_mode, PaginationResolver, Resolution};
pub use window::Window;
