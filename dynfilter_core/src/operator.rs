//! Operator catalog: which operators each value type offers and how they are labelled.

use serde::{Deserialize, Serialize};

use crate::schema::{Column, ValueType};

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
    strum::EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    Between,
    In,
    NotIn,
}

/// Shape of the operand an operator takes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Arity {
    /// One value.
    Scalar,
    /// Any number of values.
    List,
    /// Inclusive minimum and maximum.
    Range,
}

impl Operator {
    pub fn arity(&self) -> Arity {
        match self {
            Operator::In | Operator::NotIn => Arity::List,
            Operator::Between => Arity::Range,
            _ => Arity::Scalar,
        }
    }

    /// Human readable label for operator pickers.
    pub fn label(&self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::NotEquals => "Not equal to",
            Operator::Contains => "Contains",
            Operator::NotContains => "Does not contain",
            Operator::StartsWith => "Starts with",
            Operator::EndsWith => "Ends with",
            Operator::GreaterThan => "Greater than",
            Operator::LessThan => "Less than",
            Operator::Between => "Between",
            Operator::In => "In",
            Operator::NotIn => "Not in",
        }
    }
}

/// Operators offered for a value type when a column does not restrict them.
pub fn default_operators(ty: ValueType) -> &'static [Operator] {
    use Operator::*;
    match ty {
        ValueType::Text => &[
            Equals,
            NotEquals,
            Contains,
            NotContains,
            StartsWith,
            EndsWith,
        ],
        ValueType::Number | ValueType::Date => &[Equals, NotEquals, GreaterThan, LessThan, Between],
        ValueType::Select => &[Equals, NotEquals, In, NotIn],
        ValueType::MultiSelect => &[In, NotIn],
        ValueType::Boolean => &[Equals],
    }
}

/// Column's own operator list if it declares one, type defaults otherwise.
pub fn effective_operators(column: &Column) -> &[Operator] {
    column
        .operators
        .as_deref()
        .unwrap_or_else(|| default_operators(column.ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn every_operator_has_a_label() {
        for op in Operator::iter() {
            assert!(!op.label().is_empty());
        }
    }

    #[test]
    fn wire_names_are_camel_case() {
        assert_eq!(Operator::NotEquals.to_string(), "notEquals");
        assert_eq!(Operator::In.to_string(), "in");
        assert_eq!(Operator::from_str("notIn").unwrap(), Operator::NotIn);
        assert!(Operator::from_str("like").is_err());
        assert_eq!(
            serde_json::to_string(&Operator::StartsWith).unwrap(),
            "\"startsWith\""
        );
    }

    #[test]
    fn type_defaults() {
        assert_eq!(default_operators(ValueType::Boolean), &[Operator::Equals]);
        assert_eq!(
            default_operators(ValueType::MultiSelect),
            &[Operator::In, Operator::NotIn]
        );
        assert_eq!(default_operators(ValueType::Text)[0], Operator::Equals);
        assert_eq!(default_operators(ValueType::Date).len(), 5);
    }

    #[test]
    fn every_type_offers_distinct_operators() {
        for ty in ValueType::iter() {
            let ops = default_operators(ty);
            assert!(!ops.is_empty(), "{ty} offers no operator");
            let distinct: std::collections::HashSet<_> = ops.iter().collect();
            assert_eq!(distinct.len(), ops.len(), "{ty} repeats an operator");
        }
    }

    #[test]
    fn column_override_wins() {
        let mut column = Column::new("status", "Status", ValueType::Text);
        assert_eq!(effective_operators(&column).len(), 6);
        column.operators = Some(vec![Operator::Contains]);
        assert_eq!(effective_operators(&column), &[Operator::Contains]);
    }

    #[test]
    fn arity() {
        assert_eq!(Operator::Between.arity(), Arity::Range);
        assert_eq!(Operator::NotIn.arity(), Arity::List);
        assert_eq!(Operator::EndsWith.arity(), Arity::Scalar);
    }
}
