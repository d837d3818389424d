//! pagekit: catalog-driven page configuration engine
//!
//! Page configurations are declarative documents listing typed blocks over
//! one object of a catalog. This crate validates candidate documents
//! (structurally against an embedded JSON Schema, then against the
//! catalog), renders valid pages into display descriptors, and keeps the
//! state of interactive data tables.

pub mod cli;
pub mod core;
pub mod render;
pub mod schema;
pub mod table;
pub mod yaml;
