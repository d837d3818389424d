//! Core module - catalog, records, and configuration

pub mod catalog;
pub mod config;
pub mod object;
pub mod property;
pub mod record;
pub mod value;

pub use catalog::{Catalog, CatalogError};
pub use config::Config;
pub use object::{ObjectDefinition, ObjectTypeKey};
pub use property::{PropertyDefinition, PropertyType};
pub use record::{DataSource, Record};
pub use value::{SortDirection, PLACEHOLDER};
