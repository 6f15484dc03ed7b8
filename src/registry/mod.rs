//! Operation registry module
//!
//! Maps a (resource, operation) pair to the descriptor of one REST endpoint.
//! Registries are usually loaded from YAML (see [`crate::loader`]) but can be
//! built in code:
//!
//! ```rust
//! use optable::registry::{OperationDescriptor, OperationRegistry};
//! use optable::pagination::PaginationMode;
//! use optable::types::Method;
//!
//! let registry = OperationRegistry::builder()
//!     .operation(
//!         "dns",
//!         "list_records",
//!         OperationDescriptor::new(Method::GET, "/2/zones/{zone}/records")
//!             .path_param("zone")
//!             .paginated(PaginationMode::PageSize),
//!     )
//!     .unwrap()
//!     .build();
//!
//! assert!(registry.contains("dns", "list_records"));
//! ```

#[allow(clippy::module_inception)]
mod registry;
mod types;

pub use registry::{validate_descriptor, OperationRegistry, RegistryBuilder};
pub use types::{BodySource, OperationDescriptor, ParamBinding};
