// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # optable
//!
//! Declarative operation tables for REST APIs.
//!
//! Each API operation is described once, as data: HTTP method, path template,
//! which input fields feed the path, query string and body, and how the
//! endpoint paginates. A generic executor then runs any operation for a batch
//! of input items, following pagination and flattening responses into records.
//!
//! ## Features
//!
//! - **Operation Registry**: `(resource, operation)` -> descriptor, validated on build
//! - **Request Dispatch**: path escaping, declared and pass-through query/body fields
//! - **Pagination**: offset/limit and page/per-page, with a page guard
//! - **Normalization**: envelope unwrapping into flat record lists
//! - **YAML Definitions**: built-in Infomaniak table, or load your own
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use optable::{load_api, Executor, ItemResolver, RuntimeConfig, Result};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let api = load_api("infomaniak")?;
//!     let runtime = RuntimeConfig::from_definition(&api, &json!({ "api_token": "..." }))?;
//!
//!     let executor = Executor::new(api.to_registry()?, runtime.build_client()?)
//!         .with_config(runtime.executor);
//!
//!     let items = ItemResolver::new(vec![json!({ "zone": "example.ch", "return_all": true })]);
//!     let output = executor.execute("dns_record", "list", &items).await?;
//!
//!     for record in output.records {
//!         println!("{record}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Executor                                │
//! │  execute(resource, operation, items) → records + failures       │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬────────────┬────────────┐
//! │ Registry │ Resolver  │  Dispatcher   │  Paginate  │ Normalize  │
//! ├──────────┼───────────┼───────────────┼────────────┼────────────┤
//! │ Lookup   │ Item      │ Path escape   │ Offset     │ Envelope   │
//! │ Validate │ fields    │ Query / body  │ Page size  │ Collection │
//! │          │ Defaults  │ Transport     │ Page guard │ Full resp. │
//! └──────────┴───────────┴───────┬───────┴────────────┴────────────┘
//!                                │
//!                     ┌──────────┴──────────┐
//!                     │ HTTP: auth, retry,  │
//!                     │ rate limit, backoff │
//!                     └─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Template interpolation and path escaping
pub mod template;

/// Operation descriptors and the registry
pub mod registry;

/// Input item field resolution
pub mod resolve;

/// Pagination strategies
pub mod pagination;

/// Response normalization
pub mod normalize;

/// Request building and dispatch
pub mod dispatch;

/// Authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Per-item execution engine
pub mod engine;

/// YAML loader for API definitions
pub mod loader;

/// Built-in API definitions
pub mod builtin;

/// Runtime configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::RuntimeConfig;
pub use dispatch::{Dispatcher, RequestOverrides, ResolvedRequest, Transport};
pub use engine::{ExecutionOutput, ExecutionStats, ExecutorConfig, Executor};
pub use http::{HttpClient, HttpClientConfig};
pub use loader::{load_api, load_api_from_str, ApiDefinition};
pub use normalize::ResponseNormalizer;
pub use pagination::PaginationMode;
pub use registry::{OperationDescriptor, OperationRegistry};
pub use resolve::{FieldResolver, ItemResolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
