//! CLI module
//!
//! Command-line interface for running API operations.
//!
//! # Commands
//!
//! - `list` - List resources and operations
//! - `describe` - Show one operation descriptor as JSON
//! - `validate` - Validate an API definition
//! - `builtins` - List built-in API definitions
//! - `run` - Execute an operation over input items

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{check_failures, parse_input, Runner};

#[cfg(test)]
mod tests;
