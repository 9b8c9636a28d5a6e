//! Shared query parameter helpers for API handlers.
//!
//! List endpoints declare their own `?filter=` structs next to the handler;
//! this module holds the pieces they have in common.

use careoffice_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use careoffice_core::types::Date;
use chrono::Utc;

/// Clamp raw `limit`/`offset` values the way every list endpoint does.
pub fn resolve_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        clamp_offset(offset),
    )
}

/// Today's date in UTC, the reference point for document status.
pub fn today() -> Date {
    Utc::now().date_naive()
}
