//! Object definitions - record types and their taxonomy

use serde::{Deserialize, Serialize};

use crate::core::property::PropertyDefinition;

/// System object type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ObjectTypeKey {
    #[default]
    Entity,
    Occurrence,
    Event,
    Activity,
    Task,
    Document,
    File,
    Metric,
    Relationship,
}

impl ObjectTypeKey {
    pub fn all() -> &'static [ObjectTypeKey] {
        &[
            ObjectTypeKey::Entity,
            ObjectTypeKey::Occurrence,
            ObjectTypeKey::Event,
            ObjectTypeKey::Activity,
            ObjectTypeKey::Task,
            ObjectTypeKey::Document,
            ObjectTypeKey::File,
            ObjectTypeKey::Metric,
            ObjectTypeKey::Relationship,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ObjectTypeKey::Entity => "Entity",
            ObjectTypeKey::Occurrence => "Occurrence",
            ObjectTypeKey::Event => "Event",
            ObjectTypeKey::Activity => "Activity",
            ObjectTypeKey::Task => "Task",
            ObjectTypeKey::Document => "Document",
            ObjectTypeKey::File => "File",
            ObjectTypeKey::Metric => "Metric",
            ObjectTypeKey::Relationship => "Relationship",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ObjectTypeKey::Entity => {
                "A persistent, identifiable object such as a person, company, or organization."
            }
            ObjectTypeKey::Occurrence => {
                "An instance of an event or activity that happened at a specific time."
            }
            ObjectTypeKey::Event => {
                "A scheduled or recorded happening with a defined start and optional end time."
            }
            ObjectTypeKey::Activity => "An action or set of actions performed by a user or system.",
            ObjectTypeKey::Task => "A unit of work to be completed, often with a due date and status.",
            ObjectTypeKey::Document => {
                "A structured or unstructured content item such as a note, proposal, or contract."
            }
            ObjectTypeKey::File => {
                "A binary or text file attachment, such as an image, PDF, or spreadsheet."
            }
            ObjectTypeKey::Metric => "A quantitative measurement or KPI tracked over time.",
            ObjectTypeKey::Relationship => "A connection or association between two records.",
        }
    }
}

impl std::fmt::Display for ObjectTypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label().to_lowercase())
    }
}

fn default_enabled() -> bool {
    true
}

/// A record type and the fields its records carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDefinition {
    /// Unique key (e.g., "contact")
    pub object_key: String,

    /// Singular display label
    pub label: String,

    /// Plural display label
    pub label_plural: String,

    /// Taxonomy category
    #[serde(default)]
    pub object_type_key: ObjectTypeKey,

    /// Disabled objects exist in the catalog but cannot back a page
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Ordered field definitions
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl ObjectDefinition {
    /// An enabled entity object with no properties
    pub fn new(
        object_key: impl Into<String>,
        label: impl Into<String>,
        label_plural: impl Into<String>,
    ) -> Self {
        Self {
            object_key: object_key.into(),
            label: label.into(),
            label_plural: label_plural.into(),
            object_type_key: ObjectTypeKey::default(),
            enabled: true,
            properties: Vec::new(),
        }
    }

    /// Find a property by key
    pub fn property(&self, key: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Whether the object declares a field with this key
    pub fn has_property(&self, key: &str) -> bool {
        self.property(key).is_some()
    }
}
