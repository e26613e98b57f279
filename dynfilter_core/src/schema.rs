use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SchemaError;
use crate::operator::{default_operators, Operator};
use crate::value::Scalar;

/// Value type of a column, drives default operators and the value editor.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ValueType {
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    Boolean,
}

impl ValueType {
    /// Whether values are picked from the column's option list.
    pub fn has_options(&self) -> bool {
        matches!(self, ValueType::Select | ValueType::MultiSelect)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnOption {
    pub label: String,
    pub value: Scalar,
}

impl ColumnOption {
    pub fn new(label: impl Into<String>, value: impl Into<Scalar>) -> Self {
        ColumnOption {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Filterable column as declared by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Row field this column reads.
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub ty: ValueType,
    /// Choices for select and multi select columns, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ColumnOption>,
    /// Restricts the operators offered for this column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operators: Option<Vec<Operator>>,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>, ty: ValueType) -> Self {
        Column {
            key: key.into(),
            label: label.into(),
            ty,
            options: vec![],
            operators: None,
        }
    }

    pub fn options(mut self, options: impl IntoIterator<Item = ColumnOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.operators = Some(operators.into_iter().collect());
        self
    }

    /// Label of the option holding `value`, if any.
    pub fn option_label(&self, value: &Scalar) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value.strict_eq(value))
            .map(|o| o.label.as_str())
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.key.is_empty() {
            return Err(SchemaError::EmptyKey);
        }
        if self.ty.has_options() && self.options.is_empty() {
            return Err(SchemaError::MissingOptions {
                key: self.key.clone(),
                ty: self.ty,
            });
        }
        if let Some(operators) = &self.operators {
            if operators.is_empty() {
                return Err(SchemaError::EmptyOperators(self.key.clone()));
            }
            let allowed = default_operators(self.ty);
            if let Some(op) = operators.iter().find(|op| !allowed.contains(*op)) {
                return Err(SchemaError::IncompatibleOperator {
                    key: self.key.clone(),
                    ty: self.ty,
                    operator: *op,
                });
            }
        }
        Ok(())
    }
}

/// Ordered, validated set of columns. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    columns: IndexMap<String, Column>,
}

impl Schema {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Result<Self, SchemaError> {
        let mut map = IndexMap::new();
        for column in columns {
            column.validate()?;
            if map.contains_key(&column.key) {
                return Err(SchemaError::DuplicateKey(column.key));
            }
            map.insert(column.key.clone(), column);
        }
        if map.is_empty() {
            return Err(SchemaError::Empty);
        }
        debug!("Schema loaded with {} columns", map.len());
        Ok(Schema { columns: map })
    }

    /// Parse a JSON array of columns.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let columns: Vec<Column> = serde_json::from_str(json)?;
        Self::new(columns)
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.get(key)
    }

    pub fn first(&self) -> Option<&Column> {
        self.columns.first().map(|(_, c)| c)
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = &Column> {
        self.columns.values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check that every column reads a field that exists in the row entity.
    pub fn ensure_fields<'a>(
        &self,
        field_names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), SchemaError> {
        let fields: HashSet<&str> = field_names.into_iter().collect();
        match self.columns.keys().find(|key| !fields.contains(key.as_str())) {
            Some(key) => Err(SchemaError::UnknownField(key.clone())),
            None => Ok(()),
        }
    }
}

impl Serialize for Schema {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.columns.values())
    }
}
