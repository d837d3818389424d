//! Producer protocol for externally generated page configurations
//!
//! A producer (for example a text-generation service) receives instructions
//! derived from the catalog plus a free-form request, and answers with a
//! candidate JSON document. Candidates are untrusted: each one goes through
//! the validator. A candidate that fails validation earns exactly one retry
//! with the error list appended to the instructions; a second failure is
//! final.

use miette::Diagnostic;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tera::Tera;
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::schema::page::PageConfig;
use crate::schema::validator::{validate, ValidationError, ValidationErrors};

const INSTRUCTIONS_TEMPLATE: &str = include_str!("../../templates/producer-instructions.tera");
const TEMPLATE_NAME: &str = "producer-instructions.tera";

/// Something that turns a request into a candidate page document
pub trait ConfigProducer {
    fn produce(&mut self, instructions: &str, request: &str) -> Result<String, ProducerError>;
}

#[derive(Debug, Error, Diagnostic)]
pub enum ProducerError {
    #[error("Producer failed: {0}")]
    #[diagnostic(code(pagekit::producer::failed))]
    Failed(String),

    #[error("Instruction template error: {0}")]
    #[diagnostic(code(pagekit::producer::template))]
    Template(String),
}

/// Terminal outcome of a failed generation
#[derive(Debug, Error, Diagnostic)]
pub enum GenerationError {
    #[error("Producer output was not valid JSON (attempt {attempt}): {message}")]
    #[diagnostic(
        code(pagekit::producer::not_json),
        help("rephrase the request; the producer must answer with a single JSON object")
    )]
    NotJson { attempt: u8, message: String },

    #[error("Producer refused the request: {0}")]
    #[diagnostic(code(pagekit::producer::refused))]
    Refused(String),

    #[error("Producer could not produce a valid page after a correction attempt")]
    #[diagnostic(code(pagekit::producer::invalid))]
    Invalid {
        #[related]
        errors: Vec<ValidationError>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Producer(#[from] ProducerError),
}

impl GenerationError {
    /// Error strings suitable for showing to the requester
    pub fn messages(&self) -> Vec<String> {
        match self {
            GenerationError::Invalid { errors } => errors.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

#[derive(Serialize)]
struct FieldSummary<'a> {
    key: &'a str,
    #[serde(rename = "type")]
    field_type: &'a str,
    required: bool,
    options: &'a [String],
}

#[derive(Serialize)]
struct ObjectSummary<'a> {
    key: &'a str,
    label: &'a str,
    fields: Vec<FieldSummary<'a>>,
}

/// Renders producer instructions describing the enabled catalog objects
pub struct ProducerInstructions<'a> {
    catalog: &'a Catalog,
    tera: Tera,
}

impl<'a> ProducerInstructions<'a> {
    pub fn new(catalog: &'a Catalog) -> Result<Self, ProducerError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, INSTRUCTIONS_TEMPLATE)
            .map_err(|e| ProducerError::Template(e.to_string()))?;
        Ok(Self { catalog, tera })
    }

    /// Instructions for a first attempt
    pub fn initial(&self) -> Result<String, ProducerError> {
        self.render(&[])
    }

    /// Instructions for a retry, with the previous attempt's errors appended
    pub fn correction(&self, errors: &[String]) -> Result<String, ProducerError> {
        self.render(errors)
    }

    fn render(&self, errors: &[String]) -> Result<String, ProducerError> {
        let objects: Vec<ObjectSummary<'_>> = self
            .catalog
            .enabled()
            .map(|object| ObjectSummary {
                key: &object.object_key,
                label: &object.label,
                fields: object
                    .properties
                    .iter()
                    .map(|p| FieldSummary {
                        key: &p.key,
                        field_type: p.property_type.as_str(),
                        required: p.required,
                        options: &p.options,
                    })
                    .collect(),
            })
            .collect();

        let object_keys: Vec<&str> = objects.iter().map(|o| o.key).collect();

        let mut context = tera::Context::new();
        context.insert("objects", &objects);
        context.insert("object_keys", &object_keys);
        context.insert("errors", errors);

        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| ProducerError::Template(e.to_string()))
    }
}

enum Attempt {
    Valid(PageConfig),
    Invalid(ValidationErrors),
}

/// Ask `producer` for a page, retrying once with validation feedback
pub fn generate_page_config<P: ConfigProducer + ?Sized>(
    producer: &mut P,
    catalog: &Catalog,
    request: &str,
) -> Result<PageConfig, GenerationError> {
    let instructions = ProducerInstructions::new(catalog)?;

    let output = producer.produce(&instructions.initial()?, request)?;
    let errors = match evaluate(&output, catalog, 1)? {
        Attempt::Valid(config) => return Ok(config),
        Attempt::Invalid(errors) => errors,
    };

    tracing::info!(
        errors = errors.len(),
        "producer output failed validation, retrying with corrections"
    );
    let retry = producer.produce(&instructions.correction(&errors.messages())?, request)?;
    match evaluate(&retry, catalog, 2)? {
        Attempt::Valid(config) => Ok(config),
        Attempt::Invalid(errors) => Err(GenerationError::Invalid {
            errors: errors.into_errors(),
        }),
    }
}

fn evaluate(output: &str, catalog: &Catalog, attempt: u8) -> Result<Attempt, GenerationError> {
    let parsed: JsonValue = serde_json::from_str(output.trim()).map_err(|e| GenerationError::NotJson {
        attempt,
        message: e.to_string(),
    })?;

    if let Some(reason) = refusal(&parsed) {
        return Err(GenerationError::Refused(reason));
    }

    Ok(match validate(&parsed, catalog) {
        Ok(config) => Attempt::Valid(config),
        Err(errors) => Attempt::Invalid(errors),
    })
}

/// An object whose only key is `error` is an explicit refusal
fn refusal(value: &JsonValue) -> Option<String> {
    let obj = value.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.get("error").map(|reason| match reason.as_str() {
        Some(s) => s.to_string(),
        None => reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use crate::core::object::ObjectDefinition;

    /// Replays canned answers and records the instructions it was given
    struct Scripted {
        answers: VecDeque<String>,
        seen: Vec<String>,
    }

    impl Scripted {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                seen: Vec::new(),
            }
        }
    }

    impl ConfigProducer for Scripted {
        fn produce(&mut self, instructions: &str, _request: &str) -> Result<String, ProducerError> {
            self.seen.push(instructions.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| ProducerError::Failed("no more answers".to_string()))
        }
    }

    const GOOD: &str = r#"{
        "id": "task-dashboard-1",
        "title": "Task Dashboard",
        "template": "dashboard",
        "objectKey": "task",
        "blocks": [{ "blockType": "statSummary", "id": "ss-1", "config": { "stats": [{ "label": "Total Tasks", "op": "count" }] } }]
    }"#;

    const BAD_FIELD: &str = r#"{
        "id": "contacts-list-1",
        "title": "Contacts",
        "template": "list",
        "objectKey": "contact",
        "blocks": [{ "blockType": "dataView", "id": "dv-1", "config": { "mode": "table", "fields": ["firstName", "ssn"] } }]
    }"#;

    #[test]
    fn test_instructions_list_catalog() {
        let catalog = Catalog::builtin();
        let text = ProducerInstructions::new(&catalog).unwrap().initial().unwrap();
        assert!(text.contains("\"contact\" | \"company\" | \"task\" | \"document\""));
        assert!(text.contains("Contact (key: \"contact\")"));
        assert!(text.contains("  - firstName (text, required)"));
        assert!(text.contains("  - status (select) [Lead, Active, Churned]"));
        assert!(!text.contains("PREVIOUS ATTEMPT FAILED"));
    }

    #[test]
    fn test_instructions_include_worked_examples() {
        let catalog = Catalog::builtin();
        let text = ProducerInstructions::new(&catalog).unwrap().initial().unwrap();
        assert!(text.contains("EXAMPLES:"));
        assert!(text.contains("User: \"List contacts with email and phone\""));
        assert!(text.contains("\"id\": \"task-dashboard-1\""));

        let deals = Catalog::new(vec![ObjectDefinition::new("deal", "Deal", "Deals")]).unwrap();
        let text = ProducerInstructions::new(&deals).unwrap().initial().unwrap();
        assert!(!text.contains("EXAMPLES:"));
        assert!(!text.contains("contacts-list-1"));
    }

    #[test]
    fn test_first_attempt_valid() {
        let catalog = Catalog::builtin();
        let mut producer = Scripted::new(&[GOOD]);
        let config = generate_page_config(&mut producer, &catalog, "Dashboard showing task count").unwrap();
        assert_eq!(config.id, "task-dashboard-1");
        assert_eq!(producer.seen.len(), 1);
    }

    #[test]
    fn test_retry_once_with_errors() {
        let catalog = Catalog::builtin();
        let mut producer = Scripted::new(&[BAD_FIELD, GOOD]);
        let config = generate_page_config(&mut producer, &catalog, "contacts").unwrap();
        assert_eq!(config.object_key, "task");
        assert_eq!(producer.seen.len(), 2);
        assert!(producer.seen[1].contains("PREVIOUS ATTEMPT FAILED WITH ERRORS:"));
        assert!(producer.seen[1].contains("Block \"dv-1\": Unknown field \"ssn\" for object \"contact\""));
    }

    #[test]
    fn test_second_failure_is_terminal() {
        let catalog = Catalog::builtin();
        let mut producer = Scripted::new(&[BAD_FIELD, BAD_FIELD, GOOD]);
        let err = generate_page_config(&mut producer, &catalog, "contacts").unwrap_err();
        assert!(matches!(err, GenerationError::Invalid { .. }));
        assert_eq!(err.messages().len(), 1);
        assert_eq!(producer.seen.len(), 2, "only one retry is allowed");
    }

    #[test]
    fn test_non_json_is_not_retried() {
        let catalog = Catalog::builtin();
        let mut producer = Scripted::new(&["Sure! Here is your page:", GOOD]);
        let err = generate_page_config(&mut producer, &catalog, "contacts").unwrap_err();
        assert!(matches!(err, GenerationError::NotJson { attempt: 1, .. }));
        assert_eq!(producer.seen.len(), 1);
    }

    #[test]
    fn test_refusal_surfaces_reason() {
        let catalog = Catalog::builtin();
        let mut producer = Scripted::new(&[r#"{ "error": "Invoices are not supported" }"#]);
        let err = generate_page_config(&mut producer, &catalog, "invoices").unwrap_err();
        assert_eq!(err.messages(), vec!["Producer refused the request: Invoices are not supported"]);
    }

    #[test]
    fn test_producer_failure_propagates() {
        let catalog = Catalog::builtin();
        let mut producer = Scripted::new(&[]);
        let err = generate_page_config(&mut producer, &catalog, "anything").unwrap_err();
        assert!(matches!(err, GenerationError::Producer(ProducerError::Failed(_))));
    }
}
