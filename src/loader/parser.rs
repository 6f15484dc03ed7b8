//! YAML parser for API definitions
//!
//! Parses and validates definition files.
//! Supports both built-in definitions (by name) and custom YAML files (by path).

use crate::builtin;
use crate::error::{Error, Result};
use crate::loader::types::ApiDefinition;
use crate::template;
use std::fs;
use std::path::Path;

/// Load an API definition from a name or file path
///
/// Bare names (no path separator, no YAML extension) are looked up among the
/// built-in definitions first.
///
/// # Examples
///
/// ```ignore
/// let api = load_api("infomaniak")?;
/// let api = load_api("./my-api.yaml")?;
/// ```
pub fn load_api(path: impl AsRef<Path>) -> Result<ApiDefinition> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = builtin::get_builtin(&path_str) {
            return load_api_from_str(yaml);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            let builtin_list = builtin::list_builtin().join(", ");
            Error::config(format!(
                "API definition '{}' not found. Built-in definitions: {}. Or provide a path to a YAML file.",
                path.display(),
                builtin_list
            ))
        } else {
            Error::config(format!(
                "Failed to read API definition '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_api_from_str(&content)
}

/// Load an API definition from a YAML string
pub fn load_api_from_str(yaml: &str) -> Result<ApiDefinition> {
    let def: ApiDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse API definition YAML: {e}")))?;

    validate_api(&def)?;
    Ok(def)
}

/// Validate an API definition
fn validate_api(def: &ApiDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("API name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::config("API base_url cannot be empty"));
    }
    // Templated URLs are checked once rendered
    if !template::has_templates(&def.base_url) {
        url::Url::parse(&def.base_url)?;
    }

    if def.operation_count() == 0 {
        return Err(Error::config("API must define at least one operation"));
    }

    let exec = &def.execution;
    if exec.page_size == 0 || exec.page_size > crate::pagination::MAX_PAGE_SIZE {
        return Err(Error::invalid_value(
            "execution.page_size",
            format!(
                "{} must be between 1 and {}",
                exec.page_size,
                crate::pagination::MAX_PAGE_SIZE
            ),
        ));
    }
    if exec.max_pages == 0 {
        return Err(Error::invalid_value(
            "execution.max_pages",
            "must be at least 1",
        ));
    }

    // Descriptor checks live in the registry builder
    def.to_registry().map(|_| ())
}
