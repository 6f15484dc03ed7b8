//! Response normalizer module
//!
//! Turns a raw API response into the list of records emitted to callers.
//!
//! # Rules
//!
//! - A bare array: each element is a record.
//! - Full-response mode: the whole response is one record.
//! - An envelope object: the collection field (`data` by default) is
//!   extracted. An array yields its elements, an object yields one record and
//!   any other non-null value yields `{"data": value}`.
//! - Anything else (missing collection, `null` response): no records.

use serde_json::{Map, Value};

/// Conventional collection key of API envelopes
pub const DEFAULT_COLLECTION_KEY: &str = "data";

/// Extracts records from raw responses
#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    collection_key: String,
    full_response: bool,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self {
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            full_response: false,
        }
    }
}

impl ResponseNormalizer {
    /// Create a normalizer extracting the `data` collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer extracting a custom collection key
    pub fn with_collection_key(key: impl Into<String>) -> Self {
        Self {
            collection_key: key.into(),
            ..Default::default()
        }
    }

    /// Emit the whole response as a single record
    #[must_use]
    pub fn full_response(mut self, full: bool) -> Self {
        self.full_response = full;
        self
    }

    /// The configured collection key
    pub fn collection_key(&self) -> &str {
        &self.collection_key
    }

    /// Normalize a raw response into records
    pub fn normalize(&self, raw: Value) -> Vec<Value> {
        match raw {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            other if self.full_response => vec![other],
            other => self.extract(other),
        }
    }

    /// Extract the collection from an envelope, ignoring full-response mode
    pub fn records(&self, raw: Value) -> Vec<Value> {
        match raw {
            Value::Array(items) => items,
            other => self.extract(other),
        }
    }

    fn extract(&self, raw: Value) -> Vec<Value> {
        let Value::Object(mut envelope) = raw else {
            return Vec::new();
        };

        match envelope.remove(&self.collection_key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(record @ Value::Object(_)) => vec![record],
            Some(scalar) => {
                let mut record = Map::new();
                record.insert(self.collection_key.clone(), scalar);
                vec![Value::Object(record)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_envelope_data_array() {
        let normalizer = ResponseNormalizer::new();
        let raw = json!({"result": "success", "data": [{"id": 1}, {"id": 2}]});
        assert_eq!(normalizer.normalize(raw), vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn test_full_response_wraps_envelope() {
        let normalizer = ResponseNormalizer::new().full_response(true);
        let raw = json!({"data": [{"id": 1}, {"id": 2}]});
        assert_eq!(normalizer.normalize(raw.clone()), vec![raw]);
    }

    #[test]
    fn test_bare_array_passes_through() {
        let raw = json!([{"id": 1}, {"id": 2}, {"id": 3}]);
        assert_eq!(ResponseNormalizer::new().normalize(raw.clone()).len(), 3);
        assert_eq!(
            ResponseNormalizer::new().full_response(true).normalize(raw).len(),
            3
        );
    }

    #[test]
    fn test_single_record_envelope() {
        let raw = json!({"result": "success", "data": {"id": 7, "name": "box"}});
        assert_eq!(
            ResponseNormalizer::new().normalize(raw),
            vec![json!({"id": 7, "name": "box"})]
        );
    }

    #[test]
    fn test_scalar_data_is_wrapped() {
        let raw = json!({"result": "success", "data": true});
        assert_eq!(
            ResponseNormalizer::new().normalize(raw),
            vec![json!({"data": true})]
        );
    }

    #[test]
    fn test_missing_collection_fails_closed() {
        let normalizer = ResponseNormalizer::new();
        assert!(normalizer.normalize(json!({"result": "success"})).is_empty());
        assert!(normalizer.normalize(json!({"data": null})).is_empty());
        assert!(normalizer.normalize(json!("text")).is_empty());
        assert!(normalizer.normalize(Value::Null).is_empty());
    }

    #[test]
    fn test_custom_collection_key() {
        let normalizer = ResponseNormalizer::with_collection_key("items");
        assert_eq!(normalizer.collection_key(), "items");
        let raw = json!({"items": [{"id": 1}], "data": [{"id": 2}]});
        assert_eq!(normalizer.normalize(raw), vec![json!({"id": 1})]);
    }

    #[test]
    fn test_records_ignores_full_response() {
        let normalizer = ResponseNormalizer::new().full_response(true);
        let raw = json!({"data": [{"id": 1}], "total": 1});
        assert_eq!(normalizer.records(raw), vec![json!({"id": 1})]);
    }
}
