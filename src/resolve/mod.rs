//! Field resolution
//!
//! The dispatcher never knows where input values come from. It asks a
//! [`FieldResolver`] for the value of a named field for one input item.
//! [`ItemResolver`] is the stock implementation backed by JSON input items
//! with shared defaults.

mod resolver;

pub use resolver::{FieldResolver, ItemResolver};

#[cfg(test)]
mod tests;
