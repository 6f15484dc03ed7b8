//! Field resolver trait and JSON-backed implementation

use crate::template::lookup_path;
use serde_json::Value;

/// Supplies input values for one execution
pub trait FieldResolver: Send + Sync {
    /// Value of `field` for input item `item_index`, if any
    fn resolve(&self, field: &str, item_index: usize) -> Option<Value>;

    /// Number of input items in this execution
    fn item_count(&self) -> usize;
}

/// Resolver over a list of JSON input items
///
/// Fields are looked up in the item first, then in the shared defaults.
/// Dotted names (`options.search`) walk nested objects; an exact key match
/// wins over the nested interpretation.
#[derive(Debug, Clone, Default)]
pub struct ItemResolver {
    items: Vec<Value>,
    defaults: Value,
}

impl ItemResolver {
    /// Create a resolver over the given items
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            defaults: Value::Null,
        }
    }

    /// Create a resolver for a single item
    pub fn single(item: Value) -> Self {
        Self::new(vec![item])
    }

    /// Set values used when an item does not define a field
    #[must_use]
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }

    /// The input items
    pub fn items(&self) -> &[Value] {
        &self.items
    }
}

fn lookup<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    if let Some(found) = value.get(field) {
        return Some(found);
    }
    if field.contains('.') {
        let parts: Vec<&str> = field.split('.').collect();
        return lookup_path(value, &parts);
    }
    None
}

impl FieldResolver for ItemResolver {
    fn resolve(&self, field: &str, item_index: usize) -> Option<Value> {
        self.items
            .get(item_index)
            .and_then(|item| lookup(item, field))
            .or_else(|| lookup(&self.defaults, field))
            .cloned()
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }
}
