//! Document loading and syntax diagnostics

pub mod diagnostics;

pub use diagnostics::{parse_document, DocumentError, DocumentSyntaxError};
