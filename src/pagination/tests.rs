//! Tests for pagination module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn param(next: &NextPage, key: &str) -> Option<serde_json::Value> {
    match next {
        NextPage::Continue { query_params } => query_params.get(key).cloned(),
        NextPage::Done => None,
    }
}

fn is_done(next: &NextPage) -> bool {
    matches!(next, NextPage::Done)
}

// ============================================================================
// PaginationState / Mode Tests
// ============================================================================

#[test]
fn test_pagination_state_constructors() {
    assert_eq!(PaginationState::new(), PaginationState { page: 0, offset: 0 });
    assert_eq!(PaginationState::with_offset(10).offset, 10);
    assert_eq!(PaginationState::with_page(3).page, 3);
}

#[test]
fn test_pagination_mode_size_param() {
    assert_eq!(PaginationMode::None.size_param(), None);
    assert_eq!(PaginationMode::OffsetLimit.size_param(), Some("limit"));
    assert_eq!(PaginationMode::PageSize.size_param(), Some("per_page"));
}

#[test]
fn test_pagination_mode_serde() {
    let mode: PaginationMode = serde_json::from_value(json!("offset_limit")).unwrap();
    assert_eq!(mode, PaginationMode::OffsetLimit);
    let mode: PaginationMode = serde_json::from_value(json!("page_size")).unwrap();
    assert_eq!(mode, PaginationMode::PageSize);
    assert_eq!(PaginationMode::default(), PaginationMode::None);
}

// ============================================================================
// Offset Paginator Tests
// ============================================================================

#[test]
fn test_offset_paginator_initial_params() {
    let paginator = OffsetPaginator::new(50);
    let params = paginator.initial_params(&paginator.initial_state());
    assert_eq!(params.get("skip"), Some(&json!(0)));
    assert_eq!(params.get("limit"), Some(&json!(50)));
}

#[test]
fn test_offset_paginator_seeded_offset() {
    let paginator = OffsetPaginator::new(20).starting_at(40);
    let mut state = paginator.initial_state();
    assert_eq!(paginator.initial_params(&state).get("skip"), Some(&json!(40)));

    let next = paginator.process_page(20, &mut state);
    assert_eq!(param(&next, "skip"), Some(json!(60)));
}

#[test]
fn test_offset_paginator_continues_on_full_page() {
    let paginator = OffsetPaginator::new(50);
    let mut state = paginator.initial_state();

    let next = paginator.process_page(50, &mut state);

    assert_eq!(state.offset, 50);
    assert_eq!(param(&next, "skip"), Some(json!(50)));
    assert_eq!(param(&next, "limit"), Some(json!(50)));
}

#[test]
fn test_offset_paginator_skip_sequence() {
    let paginator = OffsetPaginator::new(50);
    let mut state = paginator.initial_state();
    let mut skips = vec![paginator.initial_params(&state)["skip"].clone()];

    for count in [50, 50] {
        let next = paginator.process_page(count, &mut state);
        skips.push(param(&next, "skip").unwrap());
    }
    assert!(is_done(&paginator.process_page(37, &mut state)));

    assert_eq!(skips, vec![json!(0), json!(50), json!(100)]);
}

#[test]
fn test_offset_paginator_stops_on_short_or_empty_page() {
    let paginator = OffsetPaginator::new(50);
    let mut state = paginator.initial_state();

    assert!(is_done(&paginator.process_page(25, &mut state)));
    assert!(is_done(&paginator.process_page(0, &mut state)));
    assert_eq!(state.offset, 0);
}

#[test]
fn test_offset_paginator_custom_params() {
    let paginator = OffsetPaginator::with_params("offset", "count", 10);
    let params = paginator.initial_params(&paginator.initial_state());
    assert_eq!(params.get("offset"), Some(&json!(0)));
    assert_eq!(params.get("count"), Some(&json!(10)));
}

// ============================================================================
// Page Number Paginator Tests
// ============================================================================

#[test]
fn test_page_number_paginator_initial_params() {
    let paginator = PageNumberPaginator::new(20);
    let params = paginator.initial_params(&paginator.initial_state());
    assert_eq!(params.get("page"), Some(&json!(1)));
    assert_eq!(params.get("per_page"), Some(&json!(20)));
}

#[test]
fn test_page_number_paginator_page_sequence() {
    let paginator = PageNumberPaginator::new(20);
    let mut state = paginator.initial_state();
    let mut pages = vec![paginator.initial_params(&state)["page"].clone()];

    for count in [20, 20] {
        let next = paginator.process_page(count, &mut state);
        pages.push(param(&next, "page").unwrap());
    }
    assert!(is_done(&paginator.process_page(5, &mut state)));

    assert_eq!(pages, vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn test_page_number_paginator_stops_on_partial() {
    let paginator = PageNumberPaginator::new(25);
    let mut state = paginator.initial_state();
    assert!(is_done(&paginator.process_page(15, &mut state)));
}

// ============================================================================
// No Paginator / Factory Tests
// ============================================================================

#[test]
fn test_no_paginator_single_page() {
    let paginator = NoPaginator;
    let mut state = paginator.initial_state();
    assert!(paginator.initial_params(&state).is_empty());
    assert!(is_done(&paginator.process_page(500, &mut state)));
}

#[test]
fn test_paginator_for_mode() {
    let offset = paginator_for(PaginationMode::OffsetLimit, 30, 60);
    let params = offset.initial_params(&offset.initial_state());
    assert_eq!(params.get("limit"), Some(&json!(30)));
    assert_eq!(params.get("skip"), Some(&json!(60)));

    let paged = paginator_for(PaginationMode::PageSize, 30, 60);
    let params = paged.initial_params(&paged.initial_state());
    assert_eq!(params.get("per_page"), Some(&json!(30)));
    assert_eq!(params.get("page"), Some(&json!(1)));

    let none = paginator_for(PaginationMode::None, 30, 0);
    assert!(none.initial_params(&none.initial_state()).is_empty());
}
