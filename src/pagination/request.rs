//! Query parsing: untyped query strings to a typed [`PageRequest`].
//!
//! Every numeric field goes through exactly one parse-or-default function.
//! Malformed input never raises an error; it falls back to the field default.

use crate::domain::SortKey;

/// Default (and maximum) limit in offset mode.
pub const OFFSET_MODE_LIMIT: i64 = 25;

/// Default limit in paging mode when the caller gives none.
pub const PAGING_MODE_LIMIT: i64 = 1000;

// =============================================================================
// Raw Query
// =============================================================================

/// Query parameters as received, before any coercion.
///
/// `Some("")` means the key was present with an empty value; it still counts
/// as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    pub page: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

impl RawQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an URL query string (without the leading `?`).
    ///
    /// Decoding follows `application/x-www-form-urlencoded`: `+` is a space
    /// and invalid UTF-8 is replaced. The first occurrence of a repeated key
    /// wins; unknown keys are ignored.
    pub fn from_query_string(query: &str) -> Self {
        let mut raw = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "page" => &mut raw.page,
                "offset" => &mut raw.offset,
                "limit" => &mut raw.limit,
                "sort" => &mut raw.sort,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        raw
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

// =============================================================================
// Field Coercion
// =============================================================================

/// Leading-integer parse.
///
/// Skips leading whitespace, accepts one optional sign, then takes the longest
/// run of ASCII digits: `"12abc"` → 12, `"1.9"` → 1, `"-3"` → -3. No digits, or
/// a value outside `i64`, yields `None`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Requested page: positive values only.
pub fn parse_page(raw: Option<&str>) -> Option<i64> {
    raw.and_then(parse_leading_int).filter(|page| *page > 0)
}

/// Requested offset: non-negative values only.
pub fn parse_offset(raw: Option<&str>) -> Option<u64> {
    raw.and_then(parse_leading_int)
        .and_then(|offset| u64::try_from(offset).ok())
}

/// Requested limit, verbatim. Mode-specific defaults are applied later.
pub fn parse_limit(raw: Option<&str>) -> Option<i64> {
    raw.and_then(parse_leading_int)
}

pub fn parse_sort(raw: Option<&str>) -> SortKey {
    SortKey::from_query(raw)
}

// =============================================================================
// Page Request
// =============================================================================

/// Which parameter drives the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// `page` was supplied: the window is derived from a page number.
    Paging,
    /// Direct offset/limit.
    Offset,
}

impl PaginationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaginationMode::Paging => "paging",
            PaginationMode::Offset => "offset",
        }
    }
}

impl std::fmt::Display for PaginationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed, validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Parsed page, `None` when absent, malformed or non-positive
    pub page: Option<i64>,
    /// Whether `page` was present at all
    pub page_supplied: bool,
    /// Parsed offset, `None` when absent, malformed or negative
    pub offset: Option<u64>,
    /// Whether `offset` was present at all
    pub offset_supplied: bool,
    /// Parsed limit, verbatim
    pub limit: Option<i64>,
    pub sort: SortKey,
}

impl PageRequest {
    pub fn parse(raw: &RawQuery) -> Self {
        Self {
            page: parse_page(raw.page.as_deref()),
            page_supplied: raw.page.is_some(),
            offset: parse_offset(raw.offset.as_deref()),
            offset_supplied: raw.offset.is_some(),
            limit: parse_limit(raw.limit.as_deref()),
            sort: parse_sort(raw.sort.as_deref()),
        }
    }

    pub fn mode(&self) -> PaginationMode {
        if self.page_supplied {
            PaginationMode::Paging
        } else {
            PaginationMode::Offset
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
