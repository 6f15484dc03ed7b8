//! Error types for optable
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Three kinds of failure reach callers of an operation: a selection error
//! (unknown resource/operation), a parameter error (a path placeholder with
//! no usable value) and an API error wrapping whatever the transport raised.

use thiserror::Error;

/// The main error type for optable
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Selection / Parameter Errors
    // ============================================================================
    #[error("Operation '{operation}' not found for resource '{resource}'")]
    OperationNotFound { resource: String, operation: String },

    #[error("Missing required path parameter: {param}")]
    MissingPathParam { param: String },

    #[error("Invalid path parameter '{param}': {message}")]
    InvalidPathParam { param: String, message: String },

    #[error("Invalid operation '{resource}.{operation}': {message}")]
    InvalidOperation {
        resource: String,
        operation: String,
        message: String,
    },

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error("API request failed ({context}): {source}")]
    Api {
        context: String,
        #[source]
        source: Box<Error>,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Pagination stopped after {max_pages} pages without reaching the end")]
    PaginationLimit { max_pages: u32 },

    #[error("{failed} of {total} items failed")]
    ItemsFailed { failed: usize, total: usize },

    // ============================================================================
    // Template Errors
    // ============================================================================
    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an operation-not-found error
    pub fn operation_not_found(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::OperationNotFound {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    /// Create a missing path parameter error
    pub fn missing_path_param(param: impl Into<String>) -> Self {
        Self::MissingPathParam {
            param: param.into(),
        }
    }

    /// Create an invalid path parameter error
    pub fn invalid_path_param(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPathParam {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(
        resource: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidOperation {
            resource: resource.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Wrap a transport failure into an API error
    pub fn api(context: impl Into<String>, source: Error) -> Self {
        Self::Api {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// The requested resource/operation does not exist
    pub fn is_selection_error(&self) -> bool {
        matches!(self, Error::OperationNotFound { .. })
    }

    /// A path parameter resolved to nothing or to an unusable segment
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Error::MissingPathParam { .. } | Error::InvalidPathParam { .. }
        )
    }

    /// The transport raised an error for a dispatched request
    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::Api { .. })
    }

    /// Check if this error is retryable at the transport level
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect() || e.is_timeout(),
            Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for optable
pub type Result<T> = std::result::Result<T, Error>;
