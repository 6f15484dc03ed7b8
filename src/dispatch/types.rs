//! Dispatch types
//!
//! The resolved request handed to a transport, override maps used by
//! pagination, and the transport seam itself.

use crate::error::Result;
use crate::types::Method;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// Key prefix marking entries of an extra query field group
pub const QUERY_EXTRA_PREFIX: &str = "query_";

/// Key prefix marking entries of an extra body field group
pub const BODY_EXTRA_PREFIX: &str = "body_";

/// A fully resolved request, ready to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRequest {
    /// HTTP method
    pub method: Method,
    /// Path with placeholders substituted and escaped
    pub path: String,
    /// Query parameters, in insertion order
    pub query: Map<String, Value>,
    /// JSON body, if any
    pub body: Option<Value>,
}

impl ResolvedRequest {
    /// Short `METHOD /path` label for logs and error context
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Values merged over the resolved query and body
///
/// Applied last, so they take precedence over declared and extra fields.
#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    /// Query overrides
    pub query: Map<String, Value>,
    /// Body overrides (only applied to flat-field bodies)
    pub body: Map<String, Value>,
}

impl RequestOverrides {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides carrying only query parameters
    pub fn with_query(query: Map<String, Value>) -> Self {
        Self {
            query,
            body: Map::new(),
        }
    }

    /// Add one query override
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add one body override
    #[must_use]
    pub fn body(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }
}

/// Sends resolved requests
///
/// TLS, connection pooling, authentication and retries all belong to the
/// implementation. Any failure is reported as an error; non-2xx responses
/// must not be returned as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the decoded JSON response
    async fn send(&self, request: &ResolvedRequest) -> Result<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: &ResolvedRequest) -> Result<Value> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &ResolvedRequest) -> Result<Value> {
        (**self).send(request).await
    }
}

/// Records collected by a paginated call
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    /// Concatenated records, in page order
    pub records: Vec<Value>,
    /// Number of requests issued
    pub pages: u32,
}
