use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::ConditionError;
use crate::operator::{effective_operators, Arity, Operator};
use crate::schema::Column;
use crate::value::Scalar;

/// Identity of a condition within a session, never reused.
///
/// Ids handed out by a session are sequence numbers written as `filter-N`. Ids read from
/// records that do not have that exact form are kept verbatim, so they encode back unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ConditionId {
    Seq(u64),
    Named(String),
}

impl ConditionId {
    pub fn seq(&self) -> Option<u64> {
        match self {
            ConditionId::Seq(n) => Some(*n),
            ConditionId::Named(_) => None,
        }
    }
}

impl Display for ConditionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionId::Seq(n) => write!(f, "filter-{n}"),
            ConditionId::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for ConditionId {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ConditionError::InvalidId(s.to_string()));
        }
        let seq = s
            .strip_prefix("filter-")
            .and_then(|digits| digits.parse::<u64>().ok())
            .map(ConditionId::Seq);
        match seq {
            // "filter-007" stays named so it is written back as it came in
            Some(id) if id.to_string() == s => Ok(id),
            _ => Ok(ConditionId::Named(s.to_string())),
        }
    }
}

/// Operator together with its operand, so the operand shape always fits the operator.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Equals(Scalar),
    NotEquals(Scalar),
    Contains(Scalar),
    NotContains(Scalar),
    StartsWith(Scalar),
    EndsWith(Scalar),
    GreaterThan(Scalar),
    LessThan(Scalar),
    /// Inclusive on both ends, a missing maximum never matches.
    Between { min: Scalar, max: Option<Scalar> },
    In(Vec<Scalar>),
    NotIn(Vec<Scalar>),
    /// Operator name outside the known set, only produced when decoding records.
    /// Always matches.
    Unrecognized(String),
}

impl Predicate {
    /// Predicate with an empty operand: empty string, empty list, or empty range.
    pub fn empty(op: Operator) -> Self {
        Self::new(op, Scalar::default(), vec![])
    }

    /// Predicate from the wire slots: `value` feeds the scalar operators and the range
    /// minimum, `values` feeds the list operators and the first element is the range maximum.
    /// The slot the operator does not use is dropped.
    pub fn new(op: Operator, value: Scalar, values: Vec<Scalar>) -> Self {
        match op {
            Operator::Equals => Predicate::Equals(value),
            Operator::NotEquals => Predicate::NotEquals(value),
            Operator::Contains => Predicate::Contains(value),
            Operator::NotContains => Predicate::NotContains(value),
            Operator::StartsWith => Predicate::StartsWith(value),
            Operator::EndsWith => Predicate::EndsWith(value),
            Operator::GreaterThan => Predicate::GreaterThan(value),
            Operator::LessThan => Predicate::LessThan(value),
            Operator::Between => Predicate::Between {
                min: value,
                max: values.into_iter().next(),
            },
            Operator::In => Predicate::In(values),
            Operator::NotIn => Predicate::NotIn(values),
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        let op = match self {
            Predicate::Equals(_) => Operator::Equals,
            Predicate::NotEquals(_) => Operator::NotEquals,
            Predicate::Contains(_) => Operator::Contains,
            Predicate::NotContains(_) => Operator::NotContains,
            Predicate::StartsWith(_) => Operator::StartsWith,
            Predicate::EndsWith(_) => Operator::EndsWith,
            Predicate::GreaterThan(_) => Operator::GreaterThan,
            Predicate::LessThan(_) => Operator::LessThan,
            Predicate::Between { .. } => Operator::Between,
            Predicate::In(_) => Operator::In,
            Predicate::NotIn(_) => Operator::NotIn,
            Predicate::Unrecognized(_) => return None,
        };
        Some(op)
    }

    /// Single operand, or the minimum of a range.
    pub fn scalar(&self) -> Option<&Scalar> {
        match self {
            Predicate::Equals(v)
            | Predicate::NotEquals(v)
            | Predicate::Contains(v)
            | Predicate::NotContains(v)
            | Predicate::StartsWith(v)
            | Predicate::EndsWith(v)
            | Predicate::GreaterThan(v)
            | Predicate::LessThan(v)
            | Predicate::Between { min: v, .. } => Some(v),
            Predicate::In(_) | Predicate::NotIn(_) | Predicate::Unrecognized(_) => None,
        }
    }

    pub fn values(&self) -> Option<&[Scalar]> {
        match self {
            Predicate::In(values) | Predicate::NotIn(values) => Some(values),
            _ => None,
        }
    }

    /// Switch to another operator. The single value (or range minimum) carries over between
    /// scalar and range operators, the list carries over between list operators, everything
    /// else starts empty.
    pub fn with_operator(&self, op: Operator) -> Self {
        if self.operator() == Some(op) {
            return self.clone();
        }
        let value = match op.arity() {
            Arity::Scalar | Arity::Range => self.scalar().cloned().unwrap_or_default(),
            Arity::List => Scalar::default(),
        };
        let values = match op.arity() {
            Arity::List => self.values().map(<[Scalar]>::to_vec).unwrap_or_default(),
            Arity::Scalar | Arity::Range => vec![],
        };
        Self::new(op, value, values)
    }
}

/// One filter clause: a column reference plus a predicate on its value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConditionRecord", into = "ConditionRecord")]
pub struct Condition {
    pub id: ConditionId,
    /// Key of the [Column] this condition reads, a lookup not an ownership.
    pub column_key: String,
    pub predicate: Predicate,
}

impl Condition {
    /// Default condition for a column: first offered operator and an empty operand.
    pub fn new(id: ConditionId, column: &Column) -> Self {
        let op = effective_operators(column)
            .first()
            .copied()
            .unwrap_or(Operator::Equals);
        Condition {
            id,
            column_key: column.key.clone(),
            predicate: Predicate::empty(op),
        }
    }

    pub fn with_predicate(
        id: ConditionId,
        column_key: impl Into<String>,
        predicate: Predicate,
    ) -> Self {
        Condition {
            id,
            column_key: column_key.into(),
            predicate,
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        self.predicate.operator()
    }
}

/// Wire shape of a condition: `{id, columnKey, operator, value?, values?}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRecord {
    pub id: String,
    pub column_key: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<serde_json::Value>>,
}

impl TryFrom<ConditionRecord> for Condition {
    type Error = ConditionError;

    fn try_from(record: ConditionRecord) -> Result<Self, Self::Error> {
        let id: ConditionId = record.id.parse()?;
        let predicate = match Operator::from_str(&record.operator) {
            Ok(op) => {
                let value = match record.value {
                    Some(v) => Scalar::try_from(v)?,
                    None => Scalar::default(),
                };
                let values = record
                    .values
                    .unwrap_or_default()
                    .into_iter()
                    .map(Scalar::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Predicate::new(op, value, values)
            }
            Err(_) => Predicate::Unrecognized(record.operator),
        };
        Ok(Condition {
            id,
            column_key: record.column_key,
            predicate,
        })
    }
}

impl From<Condition> for ConditionRecord {
    fn from(condition: Condition) -> Self {
        let operator = match &condition.predicate {
            Predicate::Unrecognized(name) => name.clone(),
            p => p.operator().map(|op| op.to_string()).unwrap_or_default(),
        };
        let (value, values): (Option<serde_json::Value>, Option<Vec<serde_json::Value>>) =
            match condition.predicate {
                Predicate::Between { min, max } => (
                    Some(min.into()),
                    Some(max.into_iter().map(Into::into).collect()),
                ),
                Predicate::In(values) | Predicate::NotIn(values) => {
                    (None, Some(values.into_iter().map(Into::into).collect()))
                }
                Predicate::Unrecognized(_) => (None, None),
                Predicate::Equals(v)
                | Predicate::NotEquals(v)
                | Predicate::Contains(v)
                | Predicate::NotContains(v)
                | Predicate::StartsWith(v)
                | Predicate::EndsWith(v)
                | Predicate::GreaterThan(v)
                | Predicate::LessThan(v) => (Some(v.into()), None),
            };
        ConditionRecord {
            id: condition.id.to_string(),
            column_key: condition.column_key,
            operator,
            value,
            values,
        }
    }
}
