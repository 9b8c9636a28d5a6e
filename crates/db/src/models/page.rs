//! Paged list envelope returned by list endpoints.

use serde::Serialize;

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    /// Slice an already-filtered, fully loaded list into a page.
    pub fn from_vec(all: Vec<T>, limit: i64, offset: i64) -> Self {
        let total = all.len() as i64;
        let items = all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Self {
            items,
            total,
            limit,
            offset,
        }
    }
}
