//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{NextPage, PaginationMode, PaginationState, Paginator};
use serde_json::{Map, Value};

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination
///
/// Uses limit and skip parameters to paginate: `?limit=50&skip=100`.
/// A page shorter than the limit (or an empty page) ends the iteration.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Query parameter name for limit
    pub limit_param: String,
    /// Number of records per page
    pub limit: u32,
    /// Offset of the first request
    pub start_offset: u64,
}

impl OffsetPaginator {
    /// Create an offset paginator using `skip` / `limit`
    pub fn new(limit: u32) -> Self {
        Self::with_params("skip", "limit", limit)
    }

    /// Create an offset paginator with custom parameter names
    pub fn with_params(
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        limit: u32,
    ) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            limit,
            start_offset: 0,
        }
    }

    /// Start at a record offset instead of 0
    #[must_use]
    pub fn starting_at(mut self, offset: u64) -> Self {
        self.start_offset = offset;
        self
    }

    fn params(&self, offset: u64) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert(self.limit_param.clone(), Value::from(self.limit));
        params.insert(self.offset_param.clone(), Value::from(offset));
        params
    }
}

impl Paginator for OffsetPaginator {
    fn initial_state(&self) -> PaginationState {
        PaginationState::with_offset(self.start_offset)
    }

    fn initial_params(&self, state: &PaginationState) -> Map<String, Value> {
        self.params(state.offset)
    }

    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage {
        if records_count == 0 || records_count < self.limit as usize {
            return NextPage::Done;
        }

        state.offset += u64::from(self.limit);
        NextPage::with_params(self.params(state.offset))
    }
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination
///
/// Uses page and page size parameters: `?page=2&per_page=50`.
/// Pages are numbered from 1.
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter name for page number
    pub page_param: String,
    /// Query parameter name for page size
    pub page_size_param: String,
    /// First page number
    pub start_page: u32,
    /// Page size value
    pub page_size: u32,
}

impl PageNumberPaginator {
    /// Create a page number paginator using `page` / `per_page`, starting at 1
    pub fn new(page_size: u32) -> Self {
        Self {
            page_param: "page".to_string(),
            page_size_param: "per_page".to_string(),
            start_page: 1,
            page_size,
        }
    }

    fn params(&self, page: u32) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert(self.page_param.clone(), Value::from(page));
        params.insert(self.page_size_param.clone(), Value::from(self.page_size));
        params
    }
}

impl Paginator for PageNumberPaginator {
    fn initial_state(&self) -> PaginationState {
        PaginationState::with_page(self.start_page)
    }

    fn initial_params(&self, state: &PaginationState) -> Map<String, Value> {
        self.params(state.page)
    }

    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage {
        if records_count == 0 || records_count < self.page_size as usize {
            return NextPage::Done;
        }

        state.page += 1;
        NextPage::with_params(self.params(state.page))
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn initial_params(&self, _state: &PaginationState) -> Map<String, Value> {
        Map::new()
    }

    fn process_page(&self, _records_count: usize, _state: &mut PaginationState) -> NextPage {
        NextPage::Done
    }
}

/// Build the strategy for a declared pagination mode
///
/// `start_offset` only applies to offset pagination.
pub fn paginator_for(mode: PaginationMode, page_size: u32, start_offset: u64) -> Box<dyn Paginator> {
    match mode {
        PaginationMode::None => Box::new(NoPaginator),
        PaginationMode::OffsetLimit => {
            Box::new(OffsetPaginator::new(page_size).starting_at(start_offset))
        }
        PaginationMode::PageSize => Box::new(PageNumberPaginator::new(page_size)),
    }
}
