//! Tests for field resolution

use super::*;
use serde_json::json;

#[test]
fn test_resolve_from_item() {
    let resolver = ItemResolver::new(vec![json!({"zone": "a.ch"}), json!({"zone": "b.ch"})]);

    assert_eq!(resolver.item_count(), 2);
    assert_eq!(resolver.resolve("zone", 0), Some(json!("a.ch")));
    assert_eq!(resolver.resolve("zone", 1), Some(json!("b.ch")));
    assert_eq!(resolver.resolve("zone", 2), None);
    assert_eq!(resolver.resolve("missing", 0), None);
}

#[test]
fn test_defaults_fill_gaps() {
    let resolver = ItemResolver::new(vec![json!({"limit": 10}), json!({})])
        .with_defaults(json!({"limit": 50, "return_all": true}));

    assert_eq!(resolver.resolve("limit", 0), Some(json!(10)));
    assert_eq!(resolver.resolve("limit", 1), Some(json!(50)));
    assert_eq!(resolver.resolve("return_all", 0), Some(json!(true)));
}

#[test]
fn test_null_in_item_does_not_fall_back() {
    let resolver =
        ItemResolver::single(json!({"zone": null})).with_defaults(json!({"zone": "x.ch"}));
    assert_eq!(resolver.resolve("zone", 0), Some(serde_json::Value::Null));
}

#[test]
fn test_dotted_fields() {
    let resolver = ItemResolver::single(json!({
        "options": {"search": "abc"},
        "a.b": 1
    }));

    assert_eq!(resolver.resolve("options.search", 0), Some(json!("abc")));
    assert_eq!(resolver.resolve("a.b", 0), Some(json!(1)));
    assert_eq!(resolver.resolve("options.other", 0), None);
}

#[test]
fn test_empty_resolver() {
    let resolver = ItemResolver::default();
    assert_eq!(resolver.item_count(), 0);
    assert!(resolver.items().is_empty());
    assert_eq!(resolver.resolve("x", 0), None);
}
