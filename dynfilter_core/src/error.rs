//! Load-time and decoding errors.
//!
//! Evaluation itself never fails: malformed conditions degrade to a non-matching or an
//! always-matching predicate, see [crate::eval].

use thiserror::Error;

use crate::operator::Operator;
use crate::schema::ValueType;

/// Column schema could not be obtained or is unusable.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema declares no columns")]
    Empty,

    #[error("Column key must not be empty")]
    EmptyKey,

    #[error("Duplicate column key: {0}")]
    DuplicateKey(String),

    #[error("Column {key} of type {ty} requires at least one option")]
    MissingOptions { key: String, ty: ValueType },

    #[error("Column {0} declares an empty operator list")]
    EmptyOperators(String),

    #[error("Operator {operator} is not applicable to column {key} of type {ty}")]
    IncompatibleOperator {
        key: String,
        ty: ValueType,
        operator: Operator,
    },

    #[error("Column {0} does not match any row field")]
    UnknownField(String),

    #[error("Invalid schema JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Schema fetch failed: {0}")]
    Fetch(String),
}

/// Row dataset could not be obtained.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid row JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Data fetch failed: {0}")]
    Fetch(String),
}

/// Condition record received over the wire does not fit the condition model.
#[derive(Error, Debug, PartialEq)]
pub enum ConditionError {
    #[error("Invalid condition id: {0}")]
    InvalidId(String),

    #[error("Operand must be a string, number or boolean, got {0}")]
    NonScalarOperand(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_display() {
        let err = SchemaError::IncompatibleOperator {
            key: "valor".to_string(),
            ty: ValueType::Number,
            operator: Operator::Contains,
        };
        assert_eq!(
            err.to_string(),
            "Operator contains is not applicable to column valor of type number"
        );
    }

    #[test]
    fn data_error_from_json() {
        let err: DataError = serde_json::from_str::<Vec<u8>>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid row JSON"));
    }
}
