use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::value::FieldValue;

/// Dynamic record whose fields are looked up by column key.
/// `null` fields are dropped on load, so a missing and a null field read the same.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, Option<FieldValue>>",
    into = "IndexMap<String, FieldValue>"
)]
pub struct Row {
    fields: IndexMap<String, FieldValue>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a JSON array of row objects.
    pub fn parse_many(json: &str) -> Result<Vec<Row>, DataError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<IndexMap<String, Option<FieldValue>>> for Row {
    fn from(raw: IndexMap<String, Option<FieldValue>>) -> Self {
        Row {
            fields: raw
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v)))
                .collect(),
        }
    }
}

impl From<Row> for IndexMap<String, FieldValue> {
    fn from(row: Row) -> Self {
        row.fields
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Row {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
