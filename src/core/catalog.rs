//! Object catalog - read-only registry of record types
//!
//! The catalog is built once (either [`Catalog::builtin`] or loaded from a
//! catalog file) and then passed by reference to the validator and the
//! renderer. There is no mutation API.

use miette::Diagnostic;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::core::object::{ObjectDefinition, ObjectTypeKey};
use crate::core::property::{PropertyDefinition, PropertyType};

/// Errors raised while building or loading a catalog
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("Duplicate object key: {0}")]
    #[diagnostic(code(pagekit::catalog::duplicate_object))]
    DuplicateObject(String),

    #[error("Duplicate property \"{property}\" on object \"{object_key}\"")]
    #[diagnostic(code(pagekit::catalog::duplicate_property))]
    DuplicateProperty { object_key: String, property: String },

    #[error("Property \"{property}\" on object \"{object_key}\" is a {property_type} field but has no options")]
    #[diagnostic(
        code(pagekit::catalog::missing_options),
        help("select and multiselect fields must list their allowed values under `options`")
    )]
    MissingOptions {
        object_key: String,
        property: String,
        property_type: PropertyType,
    },

    #[error("Property \"{property}\" on object \"{object_key}\" is a {property_type} field and cannot declare options")]
    #[diagnostic(
        code(pagekit::catalog::unexpected_options),
        help("only select and multiselect fields take `options`")
    )]
    UnexpectedOptions {
        object_key: String,
        property: String,
        property_type: PropertyType,
    },

    #[error("Failed to read catalog file {path}: {message}")]
    #[diagnostic(code(pagekit::catalog::io))]
    Io { path: String, message: String },

    #[error("Failed to parse catalog: {0}")]
    #[diagnostic(code(pagekit::catalog::parse))]
    Parse(String),
}

/// Registry of object definitions
#[derive(Debug, Clone)]
pub struct Catalog {
    objects: Vec<ObjectDefinition>,
}

impl Catalog {
    /// Build a catalog, checking key uniqueness and option declarations
    pub fn new(objects: Vec<ObjectDefinition>) -> Result<Self, CatalogError> {
        let mut seen_objects = HashSet::new();
        for object in &objects {
            if !seen_objects.insert(object.object_key.as_str()) {
                return Err(CatalogError::DuplicateObject(object.object_key.clone()));
            }

            let mut seen_props = HashSet::new();
            for prop in &object.properties {
                if !seen_props.insert(prop.key.as_str()) {
                    return Err(CatalogError::DuplicateProperty {
                        object_key: object.object_key.clone(),
                        property: prop.key.clone(),
                    });
                }
                match (prop.property_type.has_options(), prop.options.is_empty()) {
                    (true, true) => {
                        return Err(CatalogError::MissingOptions {
                            object_key: object.object_key.clone(),
                            property: prop.key.clone(),
                            property_type: prop.property_type,
                        })
                    }
                    (false, false) => {
                        return Err(CatalogError::UnexpectedOptions {
                            object_key: object.object_key.clone(),
                            property: prop.key.clone(),
                            property_type: prop.property_type,
                        })
                    }
                    _ => {}
                }
            }
        }

        Ok(Self { objects })
    }

    /// Parse a catalog from YAML (or JSON) text: a list of object definitions
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let objects: Vec<ObjectDefinition> =
            serde_yml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(objects)
    }

    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let catalog = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            objects = catalog.objects.len(),
            "loaded catalog file"
        );
        Ok(catalog)
    }

    /// Look up an object definition by key
    pub fn lookup(&self, object_key: &str) -> Option<&ObjectDefinition> {
        self.objects.iter().find(|o| o.object_key == object_key)
    }

    /// Look up an object definition that may back a page
    pub fn lookup_enabled(&self, object_key: &str) -> Option<&ObjectDefinition> {
        self.lookup(object_key).filter(|o| o.enabled)
    }

    /// Field keys declared on an object (empty if the object is unknown)
    pub fn field_keys(&self, object_key: &str) -> BTreeSet<String> {
        self.lookup(object_key)
            .map(|o| o.properties.iter().map(|p| p.key.clone()).collect())
            .unwrap_or_default()
    }

    /// Resolve a single field definition
    pub fn property(&self, object_key: &str, field_key: &str) -> Option<&PropertyDefinition> {
        self.lookup(object_key).and_then(|o| o.property(field_key))
    }

    /// All objects in declaration order
    pub fn objects(&self) -> &[ObjectDefinition] {
        &self.objects
    }

    /// Objects that may back a page
    pub fn enabled(&self) -> impl Iterator<Item = &ObjectDefinition> {
        self.objects.iter().filter(|o| o.enabled)
    }

    /// The four MVP objects: contact, company, task, document
    pub fn builtin() -> Self {
        use PropertyType::*;

        let contact = ObjectDefinition {
            object_key: "contact".to_string(),
            label: "Contact".to_string(),
            label_plural: "Contacts".to_string(),
            object_type_key: ObjectTypeKey::Entity,
            enabled: true,
            properties: vec![
                PropertyDefinition::new("firstName", "First Name", Text).required(),
                PropertyDefinition::new("lastName", "Last Name", Text).required(),
                PropertyDefinition::new("email", "Email", Email).required(),
                PropertyDefinition::new("phone", "Phone", Phone),
                PropertyDefinition::new("company", "Company", Company),
                PropertyDefinition::new("jobTitle", "Job Title", Text),
                PropertyDefinition::new("status", "Status", Select)
                    .with_options(["Lead", "Active", "Churned"]),
                PropertyDefinition::new("notes", "Notes", Textarea),
            ],
        };

        let company = ObjectDefinition {
            object_key: "company".to_string(),
            label: "Company".to_string(),
            label_plural: "Companies".to_string(),
            object_type_key: ObjectTypeKey::Entity,
            enabled: true,
            properties: vec![
                PropertyDefinition::new("name", "Company Name", Text).required(),
                PropertyDefinition::new("domain", "Website", Url),
                PropertyDefinition::new("industry", "Industry", Select).with_options([
                    "Technology",
                    "Finance",
                    "Healthcare",
                    "Retail",
                    "Other",
                ]),
                PropertyDefinition::new("size", "Company Size", Select)
                    .with_options(["1-10", "11-50", "51-200", "201-500", "500+"]),
                PropertyDefinition::new("phone", "Phone", Phone),
                PropertyDefinition::new("address", "Address", Textarea),
            ],
        };

        let task = ObjectDefinition {
            object_key: "task".to_string(),
            label: "Task".to_string(),
            label_plural: "Tasks".to_string(),
            object_type_key: ObjectTypeKey::Task,
            enabled: true,
            properties: vec![
                PropertyDefinition::new("title", "Title", Text).required(),
                PropertyDefinition::new("description", "Description", Textarea),
                PropertyDefinition::new("status", "Status", Select)
                    .with_options(["Todo", "In Progress", "Done", "Blocked"])
                    .required(),
                PropertyDefinition::new("priority", "Priority", Select)
                    .with_options(["Low", "Medium", "High", "Urgent"]),
                PropertyDefinition::new("dueDate", "Due Date", Date),
                PropertyDefinition::new("assignee", "Assignee", Owner),
            ],
        };

        let document = ObjectDefinition {
            object_key: "document".to_string(),
            label: "Document".to_string(),
            label_plural: "Documents".to_string(),
            object_type_key: ObjectTypeKey::Document,
            enabled: true,
            properties: vec![
                PropertyDefinition::new("title", "Title", Text).required(),
                PropertyDefinition::new("content", "Content", Richtext),
                PropertyDefinition::new("type", "Document Type", Select).with_options([
                    "Note", "Proposal", "Contract", "Report", "Other",
                ]),
                PropertyDefinition::new("status", "Status", Select)
                    .with_options(["Draft", "In Review", "Final", "Archived"]),
                PropertyDefinition::new("file", "Attachment", File),
            ],
        };

        Self {
            objects: vec![contact, company, task, document],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_well_formed() {
        let builtin = Catalog::builtin();
        let rebuilt = Catalog::new(builtin.objects().to_vec());
        assert!(rebuilt.is_ok(), "builtin catalog should pass its own checks");
        assert_eq!(builtin.enabled().count(), 4);
    }

    #[test]
    fn test_lookup_and_field_keys() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.lookup("contact").unwrap().label_plural, "Contacts");
        assert!(catalog.lookup("invoice").is_none());

        let keys = catalog.field_keys("task");
        assert!(keys.contains("dueDate"));
        assert!(keys.contains("assignee"));
        assert_eq!(keys.len(), 6);

        assert!(catalog.field_keys("invoice").is_empty());
    }

    #[test]
    fn test_property_resolution() {
        let catalog = Catalog::builtin();
        let prop = catalog.property("company", "domain").unwrap();
        assert_eq!(prop.label, "Website");
        assert_eq!(prop.property_type, PropertyType::Url);
        assert!(catalog.property("company", "email").is_none());
    }

    #[test]
    fn test_duplicate_object_rejected() {
        let contact = Catalog::builtin().lookup("contact").unwrap().clone();
        let result = Catalog::new(vec![contact.clone(), contact]);
        assert!(matches!(result, Err(CatalogError::DuplicateObject(k)) if k == "contact"));
    }

    #[test]
    fn test_select_without_options_rejected() {
        let yaml = r#"
- objectKey: deal
  label: Deal
  labelPlural: Deals
  properties:
    - key: stage
      label: Stage
      type: select
"#;
        let result = Catalog::from_yaml_str(yaml);
        assert!(matches!(result, Err(CatalogError::MissingOptions { .. })));
    }

    #[test]
    fn test_options_on_text_rejected() {
        let yaml = r#"
- objectKey: deal
  label: Deal
  labelPlural: Deals
  properties:
    - key: name
      label: Name
      type: text
      options: [a, b]
"#;
        let result = Catalog::from_yaml_str(yaml);
        assert!(matches!(result, Err(CatalogError::UnexpectedOptions { .. })));
    }

    #[test]
    fn test_disabled_object_not_enabled() {
        let yaml = r#"
- objectKey: deal
  label: Deal
  labelPlural: Deals
  objectTypeKey: occurrence
  enabled: false
  properties:
    - key: amount
      label: Amount
      type: currency
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();
        assert!(catalog.lookup("deal").is_some());
        assert!(catalog.lookup_enabled("deal").is_none());
        assert_eq!(catalog.enabled().count(), 0);
        assert_eq!(
            catalog.lookup("deal").unwrap().object_type_key,
            ObjectTypeKey::Occurrence
        );
    }

    #[test]
    fn test_load_missing_file() {
        let result = Catalog::load(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
