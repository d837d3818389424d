//! CLI command implementations

pub mod catalog;
pub mod completions;
pub mod generate;
pub mod prompt;
pub mod render;
pub mod validate;
