//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default number of records requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size accepted from callers
pub const MAX_PAGE_SIZE: u32 = 500;

/// Default upper bound on pages fetched by one paginated call
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Pagination style declared by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// Single request, never paginated
    #[default]
    None,
    /// `limit` / `skip` query parameters
    OffsetLimit,
    /// `page` / `per_page` query parameters
    PageSize,
}

impl PaginationMode {
    /// Query parameter that carries the page size for a single bounded request
    pub fn size_param(self) -> Option<&'static str> {
        match self {
            PaginationMode::None => None,
            PaginationMode::OffsetLimit => Some("limit"),
            PaginationMode::PageSize => Some("per_page"),
        }
    }
}

/// Result of the next page computation
#[derive(Debug, Clone)]
pub enum NextPage {
    /// More pages available with these query parameters
    Continue {
        /// Query parameters to add/replace
        query_params: Map<String, Value>,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with query parameters
    pub fn with_params(query_params: Map<String, Value>) -> Self {
        Self::Continue { query_params }
    }
}

/// Position of a pagination loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Current page number (for page-based pagination)
    pub page: u32,
    /// Current offset (for offset-based pagination)
    pub offset: u64,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state starting at a record offset
    pub fn with_offset(offset: u64) -> Self {
        Self { offset, page: 0 }
    }

    /// Create state starting at a page number
    pub fn with_page(page: u32) -> Self {
        Self { page, offset: 0 }
    }
}

/// Core trait for pagination strategies
///
/// A strategy only decides which query parameters the next request carries;
/// issuing the requests is the dispatcher's job.
pub trait Paginator: Send + Sync {
    /// State of the loop before the first request
    fn initial_state(&self) -> PaginationState {
        PaginationState::new()
    }

    /// Query parameters for the first request
    fn initial_params(&self, state: &PaginationState) -> Map<String, Value>;

    /// Process a fetched page and determine if there's a next one
    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage;
}
