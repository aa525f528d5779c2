//! # Records
//!
//! Immutable view over one store record as delivered by the transport.

use crate::constants::record_keys;
use crate::error::{HydrationError, Result};
use crate::rid::Rid;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw document-store record. Never mutated by the mapper.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a parsed JSON value; only objects are records.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(HydrationError::InvalidRecord(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw discriminator value under `class_key`, if present.
    pub fn class_value(&self, class_key: &str) -> Option<&Value> {
        self.fields.get(class_key)
    }

    pub fn rid(&self) -> Option<Rid> {
        self.get(record_keys::RID).and_then(Rid::from_json)
    }

    pub fn version(&self) -> Option<i64> {
        self.get(record_keys::VERSION).and_then(Value::as_i64)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Value> for Record {
    type Error = HydrationError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_object() {
        assert!(Record::from_value(json!({"@class": "Person"})).is_ok());
        assert!(matches!(
            Record::from_value(json!([1, 2])),
            Err(HydrationError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_metadata_accessors() {
        let record =
            Record::from_json(r##"{"@class":"Person","@rid":"#11:3","@version":4,"name":"Ann"}"##)
                .unwrap();
        assert_eq!(record.rid(), Some(Rid::new(11, 3)));
        assert_eq!(record.version(), Some(4));
        assert_eq!(record.class_value("@class"), Some(&json!("Person")));
        assert_eq!(record.len(), 4);
        assert!(record.contains("name"));
    }
}
