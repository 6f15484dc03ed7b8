//! Operation registry
//!
//! Two-level map from resource to operation to descriptor. Built once,
//! validated on insertion, read-only afterwards.

use super::types::OperationDescriptor;
use crate::error::{Error, Result};
use crate::pagination::MAX_PAGE_SIZE;
use crate::template;
use std::collections::{BTreeMap, HashMap};

/// Immutable lookup table of operation descriptors
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    resources: HashMap<String, HashMap<String, OperationDescriptor>>,
}

impl OperationRegistry {
    /// Start building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up the descriptor for a resource/operation pair
    pub fn get(&self, resource: &str, operation: &str) -> Result<&OperationDescriptor> {
        self.resources
            .get(resource)
            .and_then(|ops| ops.get(operation))
            .ok_or_else(|| Error::operation_not_found(resource, operation))
    }

    /// Check whether a resource/operation pair exists
    pub fn contains(&self, resource: &str, operation: &str) -> bool {
        self.get(resource, operation).is_ok()
    }

    /// Resource names, sorted
    pub fn resources(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Operation names of one resource, sorted (empty for unknown resources)
    pub fn operations(&self, resource: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .resources
            .get(resource)
            .map(|ops| ops.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// All descriptors keyed by `(resource, operation)`, in sorted order
    pub fn iter(&self) -> impl Iterator<Item = ((&str, &str), &OperationDescriptor)> {
        let sorted: BTreeMap<(&str, &str), &OperationDescriptor> = self
            .resources
            .iter()
            .flat_map(|(resource, ops)| {
                ops.iter()
                    .map(move |(op, desc)| ((resource.as_str(), op.as_str()), desc))
            })
            .collect();
        sorted.into_iter()
    }

    /// Total number of operations
    pub fn len(&self) -> usize {
        self.resources.values().map(HashMap::len).sum()
    }

    /// Whether the registry has no operations
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builder that validates descriptors as they are added
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    resources: HashMap<String, HashMap<String, OperationDescriptor>>,
}

impl RegistryBuilder {
    /// Add an operation, validating its descriptor
    pub fn operation(
        mut self,
        resource: impl Into<String>,
        operation: impl Into<String>,
        descriptor: OperationDescriptor,
    ) -> Result<Self> {
        let resource = resource.into();
        let operation = operation.into();
        validate_descriptor(&resource, &operation, &descriptor)?;

        let ops = self.resources.entry(resource.clone()).or_default();
        if ops.contains_key(&operation) {
            return Err(Error::invalid_operation(
                resource,
                operation,
                "defined more than once",
            ));
        }
        ops.insert(operation, descriptor);
        Ok(self)
    }

    /// Finish building
    pub fn build(self) -> OperationRegistry {
        OperationRegistry {
            resources: self.resources,
        }
    }
}

/// Check a descriptor's internal consistency
pub fn validate_descriptor(
    resource: &str,
    operation: &str,
    descriptor: &OperationDescriptor,
) -> Result<()> {
    let invalid = |message: String| Error::invalid_operation(resource, operation, message);

    if resource.is_empty() || operation.is_empty() {
        return Err(invalid("resource and operation names cannot be empty".into()));
    }

    if !descriptor.path.starts_with('/') {
        return Err(invalid(format!(
            "path '{}' must start with '/'",
            descriptor.path
        )));
    }

    let placeholders = template::placeholders(&descriptor.path);
    for name in &placeholders {
        if !descriptor.path_params.iter().any(|p| &p.name == name) {
            return Err(invalid(format!("placeholder '{{{name}}}' has no path parameter")));
        }
    }
    for param in &descriptor.path_params {
        if !placeholders.contains(&param.name) {
            return Err(invalid(format!(
                "path parameter '{}' does not appear in '{}'",
                param.name, descriptor.path
            )));
        }
    }

    if let Some(size) = descriptor.page_size {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(invalid(format!(
                "page_size {size} must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
    }

    Ok(())
}
