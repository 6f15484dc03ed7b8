//! Operation descriptor types
//!
//! A descriptor is the static description of one REST endpoint: method, path
//! template and where each request parameter comes from.

use crate::pagination::PaginationMode;
use crate::types::Method;
use serde::{Deserialize, Serialize};

/// Binds a request parameter name to the input field that supplies its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamBinding {
    /// Name used in the request (placeholder, query key or body key)
    pub name: String,
    /// Input field resolved for the value
    pub field: String,
}

impl ParamBinding {
    /// Bind a parameter to a field of a different name
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
        }
    }

    /// Bind a parameter to the field of the same name
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            field: name.clone(),
            name,
        }
    }
}

/// Where the request body comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodySource {
    /// Flat body assembled from declared fields plus an optional extras group
    Fields {
        /// Declared body parameters
        params: Vec<ParamBinding>,
        /// Field holding a map of optional `body_*` extras
        extra_group: Option<String>,
    },
    /// One field supplies the entire body as a pre-built value
    Field {
        /// Input field resolved for the body
        field: String,
    },
}

impl Default for BodySource {
    fn default() -> Self {
        Self::Fields {
            params: Vec::new(),
            extra_group: None,
        }
    }
}

impl BodySource {
    /// Whether this source can never produce a body
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Fields { params, extra_group } if params.is_empty() && extra_group.is_none())
    }
}

/// Static description of one REST endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// HTTP method
    pub method: Method,
    /// Path template with `{name}` placeholders
    pub path: String,
    /// Bindings for every path placeholder
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_params: Vec<ParamBinding>,
    /// Declared query parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_params: Vec<ParamBinding>,
    /// Field holding a map of optional `query_*` extras
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_query_group: Option<String>,
    /// Body construction
    #[serde(default, skip_serializing_if = "BodySource::is_empty")]
    pub body: BodySource,
    /// Pagination style used when all results are requested
    #[serde(default)]
    pub pagination: PaginationMode,
    /// Page size override for this operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl OperationDescriptor {
    /// Start a descriptor for `method path`
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Add a path parameter bound to the field of the same name
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>) -> Self {
        self.path_params.push(ParamBinding::same(name));
        self
    }

    /// Add a path parameter bound to a differently named field
    #[must_use]
    pub fn path_param_from(mut self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.path_params.push(ParamBinding::new(name, field));
        self
    }

    /// Add a declared query parameter
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.query_params.push(ParamBinding::new(name, field));
        self
    }

    /// Declare the extra query field group
    #[must_use]
    pub fn extra_query(mut self, group: impl Into<String>) -> Self {
        self.extra_query_group = Some(group.into());
        self
    }

    /// Add a declared body parameter
    ///
    /// Replaces a whole-body field source if one was set.
    #[must_use]
    pub fn body_param(mut self, name: impl Into<String>, field: impl Into<String>) -> Self {
        let binding = ParamBinding::new(name, field);
        match &mut self.body {
            BodySource::Fields { params, .. } => params.push(binding),
            BodySource::Field { .. } => {
                self.body = BodySource::Fields {
                    params: vec![binding],
                    extra_group: None,
                };
            }
        }
        self
    }

    /// Declare the extra body field group
    #[must_use]
    pub fn extra_body(mut self, group: impl Into<String>) -> Self {
        let group = Some(group.into());
        match &mut self.body {
            BodySource::Fields { extra_group, .. } => *extra_group = group,
            BodySource::Field { .. } => {
                self.body = BodySource::Fields {
                    params: Vec::new(),
                    extra_group: group,
                };
            }
        }
        self
    }

    /// Take the whole body from one field
    #[must_use]
    pub fn body_field(mut self, field: impl Into<String>) -> Self {
        self.body = BodySource::Field {
            field: field.into(),
        };
        self
    }

    /// Set the pagination mode
    #[must_use]
    pub fn paginated(mut self, mode: PaginationMode) -> Self {
        self.pagination = mode;
        self
    }

    /// Set the page size override
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Whether "return all" requests loop over pages for this operation
    pub fn supports_pagination(&self) -> bool {
        self.method == Method::GET && self.pagination != PaginationMode::None
    }
}
