//! Loader types
//!
//! Declarative API definition types for YAML parsing.

use crate::error::{Error, Result};
use crate::normalize::DEFAULT_COLLECTION_KEY;
use crate::pagination::{PaginationMode, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::registry::{BodySource, OperationDescriptor, OperationRegistry, ParamBinding};
use crate::template;
use crate::types::{BackoffType, ErrorMode, Method};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// API Definition
// ============================================================================

/// Top-level API definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApiDefinition {
    /// API name
    pub name: String,
    /// Definition version
    #[serde(default = "default_version")]
    pub version: String,
    /// Human readable summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base URL for all requests
    pub base_url: String,
    /// Global headers (values may be templates)
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Authentication configuration
    #[serde(default)]
    pub auth: Option<AuthDefinition>,
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpDefinition,
    /// Executor defaults
    #[serde(default)]
    pub execution: ExecutionDefinition,
    /// `resource -> operation -> definition`
    pub resources: BTreeMap<String, BTreeMap<String, OperationDefinition>>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl ApiDefinition {
    /// Number of operations across all resources
    pub fn operation_count(&self) -> usize {
        self.resources.values().map(BTreeMap::len).sum()
    }

    /// Look up one operation definition
    pub fn operation(&self, resource: &str, operation: &str) -> Option<&OperationDefinition> {
        self.resources.get(resource)?.get(operation)
    }

    /// Build the validated operation registry
    pub fn to_registry(&self) -> Result<OperationRegistry> {
        let mut builder = OperationRegistry::builder();
        for (resource, operations) in &self.resources {
            for (operation, def) in operations {
                let descriptor = def.to_descriptor(resource, operation)?;
                builder = builder.operation(resource, operation, descriptor)?;
            }
        }
        Ok(builder.build())
    }
}

// ============================================================================
// Auth Definition
// ============================================================================

/// Authentication definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDefinition {
    /// API key authentication
    ApiKey {
        /// Header or query param name
        key: String,
        /// Value (usually a template like `{{ config.api_key }}`)
        value: String,
        /// Location: header or query
        #[serde(default = "default_auth_location")]
        location: String,
        /// Prefix placed before the value
        #[serde(default)]
        prefix: Option<String>,
    },
    /// Bearer token authentication
    Bearer {
        /// Token value (template)
        token: String,
    },
    /// Basic authentication
    Basic {
        /// Username (template)
        username: String,
        /// Password (template)
        password: String,
    },
    /// Custom headers added to every request
    Headers {
        /// Header values (templates)
        headers: HashMap<String, String>,
    },
    /// No authentication
    None,
}

fn default_auth_location() -> String {
    "header".to_string()
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum retries
    #[serde(default)]
    pub max_retries: u32,
    /// Backoff between retries
    #[serde(default)]
    pub backoff: BackoffType,
    /// Initial backoff delay in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Rate limit (requests per second)
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,
    /// User agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: 0,
            backoff: BackoffType::default(),
            initial_backoff_ms: default_backoff_ms(),
            rate_limit_rps: None,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_backoff_ms() -> u64 {
    100
}

// ============================================================================
// Execution Definition
// ============================================================================

/// Executor defaults for every operation of the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExecutionDefinition {
    /// Page size used when all results are requested
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upper bound on pages per paginated call
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Envelope field holding the records
    #[serde(default = "default_collection_key")]
    pub collection_key: String,
    /// Batch error policy
    #[serde(default)]
    pub on_error: ErrorMode,
}

impl Default for ExecutionDefinition {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            collection_key: default_collection_key(),
            on_error: ErrorMode::default(),
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_collection_key() -> String {
    DEFAULT_COLLECTION_KEY.to_string()
}

// ============================================================================
// Operation Definition
// ============================================================================

/// A parameter: either a bare name or an explicit `{name, field}` binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamDefinition {
    /// Parameter read from the input field of the same name
    Name(String),
    /// Parameter read from a differently named input field
    Binding {
        /// Request-side name
        name: String,
        /// Input field (defaults to `name`)
        #[serde(default)]
        field: Option<String>,
    },
}

impl ParamDefinition {
    /// Convert to a registry binding
    pub fn to_binding(&self) -> ParamBinding {
        match self {
            ParamDefinition::Name(name) => ParamBinding::same(name),
            ParamDefinition::Binding { name, field } => {
                ParamBinding::new(name, field.as_deref().unwrap_or(name))
            }
        }
    }
}

/// One operation in YAML form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationDefinition {
    /// HTTP method
    #[serde(default = "default_method")]
    pub method: String,
    /// Path template with `{name}` placeholders
    pub path: String,
    /// Human readable summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path parameters; omitted means one per placeholder, same-named field
    #[serde(default)]
    pub path_params: Option<Vec<ParamDefinition>>,
    /// Declared query parameters
    #[serde(default)]
    pub query: Vec<ParamDefinition>,
    /// Field holding optional `query_*` extras
    #[serde(default)]
    pub extra_query: Option<String>,
    /// Declared body fields
    #[serde(default)]
    pub body: Vec<ParamDefinition>,
    /// Field holding optional `body_*` extras
    #[serde(default)]
    pub extra_body: Option<String>,
    /// Field supplying the entire body
    #[serde(default)]
    pub body_field: Option<String>,
    /// Pagination style
    #[serde(default)]
    pub pagination: PaginationMode,
    /// Page size override
    #[serde(default)]
    pub page_size: Option<u32>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl OperationDefinition {
    /// Convert to a descriptor (validated later by the registry builder)
    pub fn to_descriptor(&self, resource: &str, operation: &str) -> Result<OperationDescriptor> {
        let invalid = |message: String| Error::invalid_operation(resource, operation, message);

        let method = Method::parse(&self.method)
            .ok_or_else(|| invalid(format!("invalid HTTP method: {}", self.method)))?;

        let path_params = match &self.path_params {
            Some(params) => params.iter().map(ParamDefinition::to_binding).collect(),
            None => template::placeholders(&self.path)
                .into_iter()
                .map(ParamBinding::same)
                .collect(),
        };

        let body = match &self.body_field {
            Some(field) => {
                if !self.body.is_empty() || self.extra_body.is_some() {
                    return Err(invalid(
                        "body_field cannot be combined with body or extra_body".into(),
                    ));
                }
                BodySource::Field {
                    field: field.clone(),
                }
            }
            None => BodySource::Fields {
                params: self.body.iter().map(ParamDefinition::to_binding).collect(),
                extra_group: self.extra_body.clone(),
            },
        };

        Ok(OperationDescriptor {
            method,
            path: self.path.clone(),
            path_params,
            query_params: self.query.iter().map(ParamDefinition::to_binding).collect(),
            extra_query_group: self.extra_query.clone(),
            body,
            pagination: self.pagination,
            page_size: self.page_size,
        })
    }
}
