//! CLI command implementations

pub mod build;
pub mod completions;
pub mod migrate;
pub mod persona;
pub mod validate;
