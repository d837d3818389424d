//! Property types and field definitions for catalog objects

use serde::{Deserialize, Serialize};

/// Primitive type of a single field on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Text,
    Textarea,
    Number,
    Currency,
    Date,
    Datetime,
    Boolean,
    Select,
    Multiselect,
    Url,
    Email,
    Phone,
    Owner,
    Company,
    File,
    Richtext,
}

impl PropertyType {
    /// Get all property types in declaration order
    pub fn all() -> &'static [PropertyType] {
        &[
            PropertyType::Text,
            PropertyType::Textarea,
            PropertyType::Number,
            PropertyType::Currency,
            PropertyType::Date,
            PropertyType::Datetime,
            PropertyType::Boolean,
            PropertyType::Select,
            PropertyType::Multiselect,
            PropertyType::Url,
            PropertyType::Email,
            PropertyType::Phone,
            PropertyType::Owner,
            PropertyType::Company,
            PropertyType::File,
            PropertyType::Richtext,
        ]
    }

    /// Wire name of the type (as it appears in catalog files)
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Text => "text",
            PropertyType::Textarea => "textarea",
            PropertyType::Number => "number",
            PropertyType::Currency => "currency",
            PropertyType::Date => "date",
            PropertyType::Datetime => "datetime",
            PropertyType::Boolean => "boolean",
            PropertyType::Select => "select",
            PropertyType::Multiselect => "multiselect",
            PropertyType::Url => "url",
            PropertyType::Email => "email",
            PropertyType::Phone => "phone",
            PropertyType::Owner => "owner",
            PropertyType::Company => "company",
            PropertyType::File => "file",
            PropertyType::Richtext => "richtext",
        }
    }

    /// Human-readable label for the type
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Text => "Single-line Text",
            PropertyType::Textarea => "Multi-line Text",
            PropertyType::Number => "Number",
            PropertyType::Currency => "Currency",
            PropertyType::Date => "Date",
            PropertyType::Datetime => "Date & Time",
            PropertyType::Boolean => "Yes/No",
            PropertyType::Select => "Dropdown Select",
            PropertyType::Multiselect => "Multi-select",
            PropertyType::Url => "URL",
            PropertyType::Email => "Email",
            PropertyType::Phone => "Phone Number",
            PropertyType::Owner => "Owner (User)",
            PropertyType::Company => "Company Reference",
            PropertyType::File => "File Attachment",
            PropertyType::Richtext => "Rich Text",
        }
    }

    /// Whether a field of this type carries a fixed list of options
    pub fn has_options(&self) -> bool {
        matches!(self, PropertyType::Select | PropertyType::Multiselect)
    }

    /// Whether cells of this type can be edited inline in a table
    pub fn is_inline_editable(&self) -> bool {
        matches!(
            self,
            PropertyType::Text | PropertyType::Number | PropertyType::Select | PropertyType::Boolean
        )
    }

    /// Whether edit buffers for this type are parsed as numbers
    pub fn is_numeric(&self) -> bool {
        matches!(self, PropertyType::Number | PropertyType::Currency)
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        PropertyType::all()
            .iter()
            .find(|t| t.as_str() == lower)
            .copied()
            .ok_or_else(|| format!("Unknown property type: {}", s))
    }
}

/// A single field on a catalog object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Field key, unique within its object
    pub key: String,

    /// Display label
    pub label: String,

    /// Primitive type
    #[serde(rename = "type")]
    pub property_type: PropertyType,

    /// Whether records must carry a value for this field
    #[serde(default)]
    pub required: bool,

    /// Allowed values (select and multiselect only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertyDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            property_type,
            required: false,
            options: Vec::new(),
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_type_roundtrip_names() {
        for t in PropertyType::all() {
            let parsed: PropertyType = t.as_str().parse().unwrap();
            assert_eq!(parsed, *t);
        }
        assert!("decimal".parse::<PropertyType>().is_err());
    }

    #[test]
    fn test_property_type_serde_lowercase() {
        let json = serde_json::to_string(&PropertyType::Multiselect).unwrap();
        assert_eq!(json, "\"multiselect\"");
        let parsed: PropertyType = serde_json::from_str("\"datetime\"").unwrap();
        assert_eq!(parsed, PropertyType::Datetime);
    }

    #[test]
    fn test_inline_editable_set() {
        let editable: Vec<_> = PropertyType::all()
            .iter()
            .filter(|t| t.is_inline_editable())
            .collect();
        assert_eq!(
            editable,
            vec![
                &PropertyType::Text,
                &PropertyType::Number,
                &PropertyType::Select,
                &PropertyType::Boolean
            ]
        );
    }

    #[test]
    fn test_property_definition_yaml() {
        let yaml = r#"
key: status
label: Status
type: select
options: [Lead, Active, Churned]
"#;
        let prop: PropertyDefinition = serde_yml::from_str(yaml).unwrap();
        assert_eq!(prop.property_type, PropertyType::Select);
        assert!(!prop.required);
        assert_eq!(prop.options.len(), 3);
    }
}
