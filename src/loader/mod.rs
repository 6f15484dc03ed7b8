//! YAML Loader module
//!
//! Parse API definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `ApiDefinition` - Declarative API specification
//! - `OperationDefinition` - One endpoint, converted into a registry descriptor
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_api, load_api_from_str};
pub use types::{
    ApiDefinition, AuthDefinition, ExecutionDefinition, HttpDefinition, OperationDefinition,
    ParamDefinition,
};
