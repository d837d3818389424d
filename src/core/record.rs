//! Record model - property bags supplied by the data-access layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record of some catalog object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Stable identifier
    pub id: String,

    /// Object the record belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_key: Option<String>,

    /// Optional display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Flat field values keyed by field key
    #[serde(default)]
    pub properties: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object_key: None,
            title: None,
            properties: Map::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Builder-style property setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Raw property value (None if the key is missing)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Whether the record carries a non-null value for `key`
    pub fn has_value(&self, key: &str) -> bool {
        !crate::core::value::is_absent(self.get(key))
    }
}

/// Where the renderer gets its records from
///
/// List and dashboard pages are rendered over a collection, detail pages
/// over a single record which may not exist.
#[derive(Debug, Clone, Copy)]
pub enum DataSource<'a> {
    Collection(&'a [Record]),
    Single(Option<&'a Record>),
}

impl<'a> DataSource<'a> {
    /// Records visible to collection-oriented blocks
    pub fn records(&self) -> Vec<&'a Record> {
        match self {
            DataSource::Collection(records) => records.iter().collect(),
            DataSource::Single(record) => record.iter().copied().collect(),
        }
    }

    /// Total number of records in the source
    pub fn len(&self) -> usize {
        match self {
            DataSource::Collection(records) => records.len(),
            DataSource::Single(record) => usize::from(record.is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single record for detail-oriented blocks
    pub fn single(&self) -> Option<&'a Record> {
        match self {
            DataSource::Single(record) => *record,
            DataSource::Collection(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserialize_camel_case() {
        let json = json!({
            "id": "r1",
            "objectKey": "contact",
            "properties": { "firstName": "Ann", "email": null },
            "createdAt": "2024-01-01T00:00:00Z"
        });
        let record: Record = serde_json::from_value(json).unwrap();
        assert_eq!(record.object_key.as_deref(), Some("contact"));
        assert!(record.has_value("firstName"));
        assert!(!record.has_value("email"));
        assert!(!record.has_value("phone"));
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_data_source_counts() {
        let records = vec![Record::new("a"), Record::new("b")];
        assert_eq!(DataSource::Collection(&records).len(), 2);
        assert_eq!(DataSource::Single(Some(&records[0])).len(), 1);
        assert!(DataSource::Single(None).is_empty());
        assert!(DataSource::Collection(&records).single().is_none());
    }
}
