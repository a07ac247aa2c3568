// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only record listing.
//!
//! Queries never produce audit events.

use crate::state::State;
use plazos_domain::{DomainError, ProcurementRecord, SoftDelete};
use serde::Serialize;
use std::cmp::Reverse;

/// Default number of records per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 5;

/// Parameters for listing procurement records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    /// 1-based page number.
    pub page: u32,
    /// Records per page.
    pub limit: u32,
    /// Case-insensitive search over title and modality name.
    pub search: Option<String>,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: None,
        }
    }
}

/// Pagination metadata for a page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    /// The requested page.
    pub current_page: u32,
    /// Number of pages; zero when nothing matched.
    pub total_pages: u32,
    /// Number of matching records across all pages.
    pub total_records: usize,
    /// Records per page.
    pub limit: u32,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
    /// The next page number, if any.
    pub next_page: Option<u32>,
    /// The previous page number, if any.
    pub prev_page: Option<u32>,
}

impl PaginationInfo {
    fn new(page: u32, limit: u32, total_records: usize) -> Self {
        let pages: usize = total_records.div_ceil(limit as usize);
        let total_pages: u32 = u32::try_from(pages).unwrap_or(u32::MAX);
        let has_next_page: bool = page < total_pages;
        let has_prev_page: bool = page > 1;

        Self {
            current_page: page,
            total_pages,
            total_records,
            limit,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| page + 1),
            prev_page: has_prev_page.then(|| page - 1),
        }
    }
}

/// One page of procurement records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPage<'a> {
    /// The records on this page, newest first.
    pub records: Vec<&'a ProcurementRecord>,
    /// Pagination metadata.
    pub pagination: PaginationInfo,
}

/// Lists active records, newest first, filtered and paginated.
///
/// Records are ordered by generation time descending, ties broken by the
/// higher id. A page past the end is empty but still reports totals.
///
/// # Arguments
///
/// * `state` - The state to read
/// * `query` - Page, limit and optional search term
///
/// # Errors
///
/// Returns `DomainError::InvalidPagination` if `page` or `limit` is zero.
pub fn list_records<'a>(
    state: &'a State,
    query: &RecordQuery,
) -> Result<RecordPage<'a>, DomainError> {
    if query.page == 0 || query.limit == 0 {
        return Err(DomainError::InvalidPagination {
            page: query.page,
            limit: query.limit,
        });
    }

    let term: &str = query.search.as_deref().unwrap_or("");
    let mut matching: Vec<&ProcurementRecord> = state
        .records
        .iter()
        .filter(|r| r.is_active() && r.matches_search(term))
        .collect();
    matching.sort_by_key(|r| Reverse((r.generated_at, r.id)));

    let pagination: PaginationInfo = PaginationInfo::new(query.page, query.limit, matching.len());
    let offset: usize = (query.page as usize - 1).saturating_mul(query.limit as usize);
    let records: Vec<&ProcurementRecord> = matching
        .into_iter()
        .skip(offset)
        .take(query.limit as usize)
        .collect();

    Ok(RecordPage {
        records,
        pagination,
    })
}
