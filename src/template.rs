//! Template handling
//!
//! Two template forms are used:
//!
//! - Path templates: `/1/zones/{zone}/records/{record_id}`. Placeholders are
//!   replaced by URL-escaped path segments at dispatch time.
//! - Value templates: `Bearer {{ config.token }}`. Used in API definitions for
//!   auth and header values, rendered once against the user configuration.

use crate::error::{Error, Result};
use crate::types::value_to_string;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for matching value template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Regex for matching path placeholders: {name}
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap());

/// Characters left unescaped in a path segment (RFC 3986 unreserved)
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// ============================================================================
// Path Templates
// ============================================================================

/// Names of all `{name}` placeholders in a path template, in order of appearance
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER_REGEX.captures_iter(template) {
        let name = cap[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Escape a value for use as a single URL path segment
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Reverse of [`encode_segment`]
pub fn decode_segment(segment: &str) -> Result<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| Error::template(format!("Invalid percent-encoded segment '{segment}': {e}")))
}

/// Substitute every `{name}` placeholder with its escaped value
///
/// Fails if a placeholder has no entry in `values`.
pub fn render_path(template: &str, values: &HashMap<String, String>) -> Result<String> {
    let mut missing = Vec::new();

    let rendered = PLACEHOLDER_REGEX.replace_all(template, |cap: &regex::Captures<'_>| {
        let name = &cap[1];
        match values.get(name) {
            Some(value) => encode_segment(value),
            None => {
                missing.push(name.to_string());
                String::new()
            }
        }
    });

    if missing.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::undefined_var(missing.join(", ")))
    }
}

// ============================================================================
// Value Templates
// ============================================================================

/// Context for value template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// User configuration values (credentials, account ids, ...)
    pub config: Value,
}

impl TemplateContext {
    /// Create context with config values
    pub fn with_config(config: Value) -> Self {
        Self { config }
    }

    /// Get a value by path (e.g., "config.token")
    pub fn get(&self, path: &str) -> Option<&Value> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.split_first() {
            Some((&"config", rest)) => lookup_path(&self.config, rest),
            // Bare names are looked up in config
            _ => lookup_path(&self.config, &parts),
        }
    }
}

/// Walk a JSON value along object keys
pub fn lookup_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for part in path {
        match current {
            Value::Object(map) => {
                current = map.get(*part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Render a value template with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut result = template.to_string();
    let mut errors = Vec::new();

    for cap in TEMPLATE_REGEX.captures_iter(template) {
        let full_match = &cap[0];
        let var_path = &cap[1];

        match ctx.get(var_path) {
            Some(value) => {
                result = result.replace(full_match, &value_to_string(value));
            }
            None => errors.push(var_path.to_string()),
        }
    }

    if errors.is_empty() {
        Ok(result)
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}

/// Check if a string contains value template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_placeholders_in_order() {
        let names = placeholders("/1/zones/{zone}/records/{record_id}");
        assert_eq!(names, vec!["zone", "record_id"]);
    }

    #[test]
    fn test_placeholders_deduplicated() {
        let names = placeholders("/{a}/x/{a}/{b}");
        assert_eq!(names, vec!["a", "b"]);
        assert!(placeholders("/1/products").is_empty());
    }

    #[test]
    fn test_render_path() {
        let path = render_path(
            "/1/mail_hostings/{mail_hosting_id}/mailboxes/{mailbox}",
            &values(&[("mail_hosting_id", "1234"), ("mailbox", "info")]),
        )
        .unwrap();
        assert_eq!(path, "/1/mail_hostings/1234/mailboxes/info");
    }

    #[test]
    fn test_render_path_missing_value() {
        let result = render_path("/1/zones/{zone}", &HashMap::new());
        let err = result.unwrap_err();
        assert!(matches!(err, Error::UndefinedVariable { .. }));
        assert!(err.to_string().contains("zone"));
    }

    #[test_case("example.com", "example.com" ; "unreserved kept")]
    #[test_case("a/b", "a%2Fb" ; "slash escaped")]
    #[test_case("hello world", "hello%20world" ; "space escaped")]
    #[test_case("x?y#z", "x%3Fy%23z" ; "query and fragment escaped")]
    #[test_case("café", "caf%C3%A9" ; "utf8 escaped")]
    fn test_encode_segment(input: &str, expected: &str) {
        assert_eq!(encode_segment(input), expected);
    }

    #[test]
    fn test_reserved_value_survives_url_parsing() {
        let raw = "mail/box name?x";
        let path = render_path("/1/aliases/{alias}", &values(&[("alias", raw)])).unwrap();

        let url = url::Url::parse(&format!("https://api.example.com{path}")).unwrap();
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(decode_segment(segments[2]).unwrap(), raw);
        assert!(url.query().is_none());
    }

    #[test]
    fn test_simple_substitution() {
        let ctx = TemplateContext::with_config(json!({"token": "tok_123"}));
        let result = render("Bearer {{ config.token }}", &ctx).unwrap();
        assert_eq!(result, "Bearer tok_123");
    }

    #[test]
    fn test_bare_name_lookup() {
        let ctx = TemplateContext::with_config(json!({"account": 42, "region": "ch"}));

        assert_eq!(render("{{ account }}", &ctx).unwrap(), "42");
        assert_eq!(render("{{region}}", &ctx).unwrap(), "ch");
        assert_eq!(render("{{ config.region }}", &ctx).unwrap(), "ch");
    }

    #[test]
    fn test_nested_value() {
        let ctx = TemplateContext::with_config(json!({
            "credentials": {"user": "admin"}
        }));
        let result = render("{{ config.credentials.user }}", &ctx).unwrap();
        assert_eq!(result, "admin");
    }

    #[test]
    fn test_undefined_variable() {
        let ctx = TemplateContext::default();
        let err = render("{{ config.missing }}", &ctx).unwrap_err();
        assert!(err.to_string().contains("config.missing"));
    }

    #[test]
    fn test_has_templates() {
        assert!(has_templates("{{ config.key }}"));
        assert!(!has_templates("/1/zones/{zone}"));
        assert!(!has_templates("plain"));
    }
}
