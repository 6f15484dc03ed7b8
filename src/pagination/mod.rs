//! Pagination module
//!
//! Supports: Offset/limit (`limit` + `skip`) and page number (`page` + `per_page`)
//!
//! # Overview
//!
//! Each strategy produces the paging query parameters for the next request
//! and decides when iteration is over (short or empty page). The request loop
//! itself lives in [`crate::dispatch::Dispatcher::dispatch_paginated`].

mod strategies;
mod types;

pub use strategies::{paginator_for, NoPaginator, OffsetPaginator, PageNumberPaginator};
pub use types::{
    NextPage, PaginationMode, PaginationState, Paginator, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};

#[cfg(test)]
mod tests;
