//! Document parsing with source-located syntax diagnostics
//!
//! Page configuration documents arrive as JSON or YAML text. Both are parsed
//! into a `serde_json::Value` before validation; syntax errors carry the
//! source and a span so miette can point at the offending character.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::schema::validator::ValidationErrors;

/// Syntax error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("{format} syntax error: {message}")]
#[diagnostic(code(pagekit::document::syntax))]
pub struct DocumentSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    format: &'static str,

    /// The underlying parser message
    message: String,
}

impl DocumentSyntaxError {
    /// Create a syntax error from a serde_yml error
    pub fn from_yaml_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));
        let message = err.to_string();
        Self::at_location("YAML", message, source, filename, line, column)
    }

    /// Create a syntax error from a serde_json error
    pub fn from_json_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        let line = err.line().max(1);
        let column = err.column().max(1);
        Self::at_location("JSON", err.to_string(), source, filename, line, column)
    }

    fn at_location(
        format: &'static str,
        message: String,
        source: &str,
        filename: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let offset = line_col_to_offset(source, line, column);
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            format,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure to turn a document into a page configuration
#[derive(Debug, Error, Diagnostic)]
pub enum DocumentError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] DocumentSyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("IO error: {0}")]
    #[diagnostic(code(pagekit::document::io))]
    Io(#[from] std::io::Error),
}

/// Parse document text into an untyped value
///
/// Files ending in `.json` are parsed strictly as JSON; everything else is
/// parsed as YAML, which also accepts most JSON.
pub fn parse_document(content: &str, filename: &str) -> Result<JsonValue, DocumentSyntaxError> {
    if filename.to_lowercase().ends_with(".json") {
        serde_json::from_str(content)
            .map_err(|e| DocumentSyntaxError::from_json_error(&e, content, filename))
    } else {
        serde_yml::from_str(content)
            .map_err(|e| DocumentSyntaxError::from_yaml_error(&e, content, filename))
    }
}

/// Convert line/column to byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (idx, text) in source.split_inclusive('\n').enumerate() {
        if idx + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            return line_start + within;
        }
        line_start += text.len();
    }
    source.len().saturating_sub(1)
}

/// Generate helpful suggestions based on error message
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("trailing comma") {
        return Some("JSON does not allow a comma after the last item".to_string());
    }

    if msg_lower.contains("eof while parsing") {
        return Some("The document ends early - check for a missing closing brace or bracket".to_string());
    }

    if msg_lower.contains("key must be a string") {
        return Some("JSON object keys must be double-quoted: {\"blockType\": ...}".to_string());
    }

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("duplicate") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    None
}
