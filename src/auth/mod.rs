//! Authentication module
//!
//! Supports: API Key, Basic, Bearer, Custom Headers
//!
//! Credentials are resolved from templates before the `Authenticator` is
//! built, so applying them never fails or performs I/O.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Location};
