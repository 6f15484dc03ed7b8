//! Built-in API definitions embedded in the binary
//!
//! Lets users pass `--api infomaniak` instead of a YAML file path.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in API YAML definitions
pub static BUILTIN_APIS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("infomaniak", include_str!("../apis/infomaniak.yaml"));
    m
});

/// Get a built-in definition by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_APIS.get(name).copied()
}

/// Check if a name refers to a built-in definition
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_APIS.contains_key(name)
}

/// List all built-in definition names, sorted
pub fn list_builtin() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTIN_APIS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_api_from_str;

    #[test]
    fn test_builtin_lookup() {
        assert!(is_builtin("infomaniak"));
        assert!(!is_builtin("stripe"));
        assert!(get_builtin("infomaniak").is_some());
        assert_eq!(list_builtin(), vec!["infomaniak"]);
    }

    #[test]
    fn test_every_builtin_parses_and_validates() {
        for name in list_builtin() {
            let yaml = get_builtin(name).unwrap();
            let def = load_api_from_str(yaml)
                .unwrap_or_else(|e| panic!("built-in '{name}' is invalid: {e}"));
            assert_eq!(def.name, name);
            assert!(def.to_registry().unwrap().len() > 0);
        }
    }
}
