//! Property-Based Tests for Pagination
//!
//! # Test Properties
//!
//! 1. **Offset-mode bounds**: the resolved limit is always within 1..=25
//! 2. **Clamping**: a clamped page always lands in `[1, total_pages]`
//! 3. **Window size**: a window never yields more than `limit` entries
//! 4. **One-based offset**: offset `n > 0` starts at rank `n`

#![cfg(test)]

use proptest::prelude::*;

use super::request::{parse_leading_int, PageRequest, RawQuery};
use super::resolver::{clamp_page, page_offset, resolve_offset_mode, Resolution};
use super::window::Window;

/// Strategy for query values: numbers, junk and edge cases.
fn query_value_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        (-100i64..=100).prop_map(|n| Some(n.to_string())),
        "[a-z0-9 .+-]{0,6}".prop_map(Some),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: offset-mode limits are never above 25 and never non-positive.
    #[test]
    fn prop_offset_mode_limit_bounded(
        offset in query_value_strategy(),
        limit in query_value_strategy(),
        sort in query_value_strategy(),
    ) {
        let raw = RawQuery { page: None, offset, limit, sort };
        let request = PageRequest::parse(&raw);

        match resolve_offset_mode(&request) {
            Resolution::Fetch { window, page, .. } => {
                let limit = window.limit.expect("offset mode always bounds the window");
                prop_assert!((1..=25).contains(&limit));
                prop_assert_eq!(page, None);
            }
            Resolution::Empty(_) => prop_assert!(false, "offset mode never short-circuits"),
        }
    }

    /// Property: clamped pages stay within the page count.
    #[test]
    fn prop_clamp_page_in_range(page in any::<i64>(), total in 1u64..10_000) {
        let clamped = clamp_page(page, total);
        prop_assert!(clamped >= 1);
        prop_assert!(clamped as u64 <= total);
        if page >= 1 && (page as u64) <= total {
            prop_assert_eq!(clamped, page);
        }
    }

    /// Property: page offsets are multiples of the limit, starting at zero.
    #[test]
    fn prop_page_offset_multiple_of_limit(page in 1i64..10_000, limit in 1i64..2_000) {
        let offset = page_offset(page, limit);
        prop_assert_eq!(offset % limit as u64, 0);
        prop_assert_eq!(offset / limit as u64, (page - 1) as u64);
    }

    /// Property: a window yields at most `limit` entries, starting at rank `offset`.
    #[test]
    fn prop_window_slice(len in 0usize..200, offset in 0u64..250, limit in -5i64..60) {
        let ranks: Vec<usize> = (1..=len).collect();
        let sliced = Window::new(offset, limit).apply(ranks);

        if limit > 0 {
            prop_assert!(sliced.len() <= limit as usize);
        }
        if let Some(first) = sliced.first() {
            prop_assert_eq!(*first as u64, offset.max(1));
        }
        prop_assert!(sliced.windows(2).all(|w| w[1] == w[0] + 1));
    }

    /// Property: leading-integer parsing accepts any rendered i64.
    #[test]
    fn prop_parse_rendered_int(n in any::<i64>().prop_filter("MIN has no magnitude", |n| *n != i64::MIN), suffix in "[a-z.]{0,3}") {
        prop_assert_eq!(parse_leading_int(&format!("{n}{suffix}")), Some(n));
    }
}
