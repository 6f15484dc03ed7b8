//! Engine types
//!
//! Configuration, per-item options and results of the executor.

use crate::error::{Error, Result};
use crate::normalize::DEFAULT_COLLECTION_KEY;
use crate::pagination::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::resolve::FieldResolver;
use crate::types::ErrorMode;
use serde::Serialize;
use serde_json::Value;

/// Input field requesting every page instead of one bounded request
pub const RETURN_ALL_FIELD: &str = "return_all";

/// Input field carrying the record limit of a bounded request
pub const LIMIT_FIELD: &str = "limit";

/// Input field requesting the raw response as a single record
pub const FULL_RESPONSE_FIELD: &str = "full_response";

/// Input field seeding the first `skip` of offset pagination
pub const OFFSET_FIELD: &str = "offset";

/// Configuration for the executor
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Page size used when all results are requested
    pub page_size: u32,
    /// Upper bound on pages per paginated call
    pub max_pages: u32,
    /// Batch error policy
    pub error_mode: ErrorMode,
    /// Envelope field holding the records
    pub collection_key: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            error_mode: ErrorMode::Abort,
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
        }
    }
}

impl ExecutorConfig {
    /// Create a new executor config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set the page guard
    #[must_use]
    pub fn with_max_pages(mut self, max: u32) -> Self {
        self.max_pages = max;
        self
    }

    /// Set the batch error policy
    #[must_use]
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Set the collection key
    #[must_use]
    pub fn with_collection_key(mut self, key: impl Into<String>) -> Self {
        self.collection_key = key.into();
        self
    }
}

/// Per-item execution options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemOptions {
    /// Follow pagination to the end
    pub return_all: bool,
    /// Records requested by a bounded request
    pub limit: u32,
    /// First record offset when following offset pagination
    pub offset: u64,
    /// Emit the raw response as one record
    pub full_response: bool,
}

impl Default for ItemOptions {
    fn default() -> Self {
        Self {
            return_all: false,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            full_response: false,
        }
    }
}

impl ItemOptions {
    /// Resolve and validate the options of one input item
    ///
    /// `limit` is only read for bounded requests and `offset` only when all
    /// pages are requested; the unused one keeps its default.
    pub fn resolve(resolver: &dyn FieldResolver, item_index: usize) -> Result<Self> {
        let defaults = Self::default();
        let return_all = resolve_flag(resolver, item_index, RETURN_ALL_FIELD)?
            .unwrap_or(defaults.return_all);

        let (limit, offset) = if return_all {
            let offset = resolve_offset(resolver, item_index)?.unwrap_or(defaults.offset);
            (defaults.limit, offset)
        } else {
            let limit = resolve_limit(resolver, item_index)?.unwrap_or(defaults.limit);
            (limit, defaults.offset)
        };

        Ok(Self {
            return_all,
            limit,
            offset,
            full_response: resolve_flag(resolver, item_index, FULL_RESPONSE_FIELD)?
                .unwrap_or(defaults.full_response),
        })
    }
}

fn resolve_flag(resolver: &dyn FieldResolver, item_index: usize, field: &str) -> Result<Option<bool>> {
    match resolver.resolve(field, item_index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) if s == "true" => Ok(Some(true)),
        Some(Value::String(s)) if s == "false" => Ok(Some(false)),
        Some(other) => Err(Error::invalid_value(
            field,
            format!("expected a boolean, got {other}"),
        )),
    }
}

fn resolve_limit(resolver: &dyn FieldResolver, item_index: usize) -> Result<Option<u32>> {
    let value = match resolver.resolve(LIMIT_FIELD, item_index) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    match value {
        Some(limit) if (1..=u64::from(MAX_PAGE_SIZE)).contains(&limit) => Ok(Some(limit as u32)),
        _ => Err(Error::invalid_value(
            LIMIT_FIELD,
            format!("must be an integer between 1 and {MAX_PAGE_SIZE}"),
        )),
    }
}

fn resolve_offset(resolver: &dyn FieldResolver, item_index: usize) -> Result<Option<u64>> {
    let value = match resolver.resolve(OFFSET_FIELD, item_index) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    value.map(Some).ok_or_else(|| {
        Error::invalid_value(OFFSET_FIELD, "must be a non-negative integer")
    })
}

/// A failed input item, recorded in continue mode
#[derive(Debug)]
pub struct ItemFailure {
    /// Index of the failed input item
    pub item: usize,
    /// What went wrong
    pub error: Error,
}

impl ItemFailure {
    /// JSON form used in CLI output
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "item": self.item,
            "error": self.error.to_string(),
        })
    }
}

/// Statistics from one execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionStats {
    /// Input items processed successfully
    pub items_succeeded: usize,
    /// Input items that failed
    pub items_failed: usize,
    /// Requests sent by successful items
    pub requests: usize,
    /// Records emitted
    pub records: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ExecutionStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a successful item with its record count
    pub fn add_item(&mut self, records: usize) {
        self.items_succeeded += 1;
        self.records += records;
    }

    /// Add a failed item
    pub fn add_failure(&mut self) {
        self.items_failed += 1;
    }

    /// Add sent requests
    pub fn add_requests(&mut self, count: usize) {
        self.requests += count;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Result of executing one operation over all input items
#[derive(Debug, Default)]
pub struct ExecutionOutput {
    /// Records of every successful item, in input order
    pub records: Vec<Value>,
    /// Failed items (continue mode only)
    pub failures: Vec<ItemFailure>,
    /// Execution statistics
    pub stats: ExecutionStats,
}

impl ExecutionOutput {
    /// Whether every item succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
