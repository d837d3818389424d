//! Page configuration validation with itemized error reporting
//!
//! Validation runs in two phases:
//!
//! 1. **Structural** - the document is checked against the embedded JSON
//!    schema (`schemas/page-config.schema.json`). Every violation becomes one
//!    [`ValidationError::Structural`] carrying a dotted path. No catalog is
//!    needed for this phase.
//! 2. **Referential** - only when phase 1 passes. The page's `objectKey` is
//!    resolved against the [`Catalog`] and every field key referenced by a
//!    block is checked against that object's properties.
//!
//! Malformed input is never a panic: it is reported as data through
//! [`ValidationErrors`].

use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::Diagnostic;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::schema::page::{FieldRole, PageConfig};
use crate::yaml::diagnostics::{parse_document, DocumentError};

/// The page configuration schema, embedded at compile time
pub const PAGE_SCHEMA: &str = include_str!("../../schemas/page-config.schema.json");

/// A single problem found in a page configuration document
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ValidationError {
    /// The document does not have the expected shape
    #[error("{location}: {message}", location = path_label(.path))]
    #[diagnostic(code(pagekit::schema::structural))]
    Structural {
        path: String,
        message: String,
        #[help]
        help: Option<String>,
    },

    /// `objectKey` names no object in the catalog
    #[error("objectKey: Unknown object \"{object_key}\"")]
    #[diagnostic(
        code(pagekit::schema::unknown_object),
        help("use `pagekit catalog list` to see the available objects")
    )]
    UnknownObject { object_key: String },

    /// `objectKey` names an object that cannot back a page
    #[error("objectKey: Object \"{object_key}\" is not enabled")]
    #[diagnostic(code(pagekit::schema::disabled_object))]
    DisabledObject { object_key: String },

    /// A block refers to a field the object does not declare
    #[error("Block \"{block_id}\": Unknown {role} \"{field}\" for object \"{object_key}\"")]
    #[diagnostic(
        code(pagekit::schema::unknown_field),
        help("use `pagekit catalog show <object>` to see the object's field keys")
    )]
    UnknownField {
        block_id: String,
        role: FieldRole,
        field: String,
        object_key: String,
    },
}

impl ValidationError {
    fn structural(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::Structural {
            path: path.into(),
            message: message.into(),
            help: None,
        }
    }

    /// Whether the error came from the structural phase
    pub fn is_structural(&self) -> bool {
        matches!(self, ValidationError::Structural { .. })
    }
}

fn path_label(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

/// All problems found in a page configuration, in discovery order
#[derive(Debug, Error, Diagnostic)]
#[error("Page configuration is invalid: {summary}")]
#[diagnostic(code(pagekit::schema::invalid_page))]
pub struct ValidationErrors {
    summary: String,

    #[related]
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        let count = errors.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self { summary, errors }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Display strings for end users or for a producer's correction prompt
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// Validator bound to an object catalog
pub struct Validator<'a> {
    catalog: &'a Catalog,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Validate an untyped document into a [`PageConfig`]
    pub fn validate(&self, input: &JsonValue) -> Result<PageConfig, ValidationErrors> {
        validate(input, self.catalog)
    }

    /// Parse YAML or JSON text and validate it
    pub fn validate_str(&self, content: &str, filename: &str) -> Result<PageConfig, DocumentError> {
        let value = parse_document(content, filename)?;
        Ok(self.validate(&value)?)
    }
}

/// Validate an untyped document against the page schema and the catalog
pub fn validate(input: &JsonValue, catalog: &Catalog) -> Result<PageConfig, ValidationErrors> {
    let config = validate_structure(input)?;

    let errors = check_references(&config, catalog);
    if errors.is_empty() {
        tracing::debug!(page = %config.id, blocks = config.blocks.len(), "page configuration valid");
        Ok(config)
    } else {
        tracing::debug!(page = %config.id, errors = errors.len(), "referential validation failed");
        Err(ValidationErrors::new(errors))
    }
}

/// Structural phase only: shape and primitive types, no catalog lookups
pub fn validate_structure(input: &JsonValue) -> Result<PageConfig, ValidationErrors> {
    let schema = page_schema().map_err(|e| ValidationErrors::new(vec![e]))?;

    let errors: Vec<ValidationError> = schema.iter_errors(input).map(|e| structural_error(&e)).collect();
    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "structural validation failed");
        return Err(ValidationErrors::new(errors));
    }

    serde_json::from_value(input.clone()).map_err(|e| {
        ValidationErrors::new(vec![ValidationError::structural(
            "",
            format!("Document does not match the page shape: {}", e),
        )])
    })
}

/// Referential phase: every field key must exist on the page's object
pub fn check_references(config: &PageConfig, catalog: &Catalog) -> Vec<ValidationError> {
    let object_key = config.object_key.as_str();
    match catalog.lookup(object_key) {
        None => {
            return vec![ValidationError::UnknownObject {
                object_key: object_key.to_string(),
            }]
        }
        Some(object) if !object.enabled => {
            return vec![ValidationError::DisabledObject {
                object_key: object_key.to_string(),
            }]
        }
        Some(_) => {}
    }

    let valid_fields = catalog.field_keys(object_key);
    let mut errors = Vec::new();

    for block in &config.blocks {
        for field_ref in block.field_refs() {
            if !valid_fields.contains(field_ref.key) {
                errors.push(ValidationError::UnknownField {
                    block_id: block.id().to_string(),
                    role: field_ref.role,
                    field: field_ref.key.to_string(),
                    object_key: object_key.to_string(),
                });
            }
        }
    }

    errors
}

fn page_schema() -> Result<&'static JsonValidator, ValidationError> {
    static COMPILED: OnceLock<Result<JsonValidator, String>> = OnceLock::new();

    COMPILED
        .get_or_init(|| {
            let schema: JsonValue = serde_json::from_str(PAGE_SCHEMA).map_err(|e| e.to_string())?;
            validator_for(&schema).map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|message| {
            ValidationError::structural("", format!("Page schema failed to compile: {}", message))
        })
}

/// Convert a JSON Schema validation error to our error format
fn structural_error(error: &JsonSchemaError) -> ValidationError {
    use jsonschema::error::ValidationErrorKind as Kind;

    let mut segments = pointer_segments(error.instance_path.as_str());

    let (message, help) = match &error.kind {
        Kind::Required { property } => {
            let prop = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            let help = format!("Add the '{}' field", prop);
            segments.push(prop);
            ("Required".to_string(), Some(help))
        }
        Kind::AdditionalProperties { unexpected } => {
            let keys = unexpected
                .iter()
                .map(|k| format!("'{}'", k))
                .collect::<Vec<_>>()
                .join(", ");
            let help = if unexpected.len() == 1 {
                format!("Remove the '{}' field or check spelling", unexpected[0])
            } else {
                "Remove unknown fields or check spelling".to_string()
            };
            (format!("Unrecognized key(s) in object: {}", keys), Some(help))
        }
        Kind::Enum { options } => (
            format!("Invalid value, expected one of: {}", format_enum_options(options)),
            None,
        ),
        Kind::MinItems { limit } => (min_items_message(segments.last(), *limit), None),
        Kind::MaxItems { limit } => (max_items_message(segments.last(), *limit), None),
        _ => (error.to_string(), None),
    };

    ValidationError::Structural {
        path: segments.join("."),
        message,
        help,
    }
}

/// Split a JSON pointer ("/blocks/0/config") into unescaped segments
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Format enum options as a string
fn format_enum_options(options: &JsonValue) -> String {
    if let Some(arr) = options.as_array() {
        arr.iter()
            .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        options.to_string()
    }
}

fn min_items_message(key: Option<&String>, limit: u64) -> String {
    match key.map(String::as_str) {
        Some("fields") => "At least one field required".to_string(),
        Some("stats") => "At least one stat required".to_string(),
        Some("blocks") => "At least one block required".to_string(),
        _ => format!("Must contain at least {} item(s)", limit),
    }
}

fn max_items_message(key: Option<&String>, limit: u64) -> String {
    match key.map(String::as_str) {
        Some("stats") => format!("Maximum {} stats", limit),
        _ => format!("Must contain at most {} item(s)", limit),
    }
}
