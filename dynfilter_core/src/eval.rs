//! Predicate evaluator.
//!
//! Decides whether a row satisfies one condition, and filters a row set by a list of
//! conditions combined with logical AND. Evaluation never fails:
//! * a missing field reads as an empty string for the text operators and as NaN for the
//!   numeric ones, so it matches `notEquals`/`notContains`/`notIn` and nothing else;
//! * a value that does not coerce to a number makes `greaterThan`/`lessThan`/`between` false;
//! * an unrecognized operator always matches, so one malformed condition cannot hide rows.

use log::{debug, trace};

use crate::condition::{Condition, Predicate};
use crate::row::Row;
use crate::value::{FieldValue, Scalar};

pub fn matches_condition(row: &Row, condition: &Condition) -> bool {
    let item = row.get(&condition.column_key);
    match &condition.predicate {
        Predicate::Equals(value) => strict_equals(item, value),
        Predicate::NotEquals(value) => !strict_equals(item, value),
        Predicate::Contains(value) => lower_text(item).contains(&value.to_text().to_lowercase()),
        Predicate::NotContains(value) => {
            !lower_text(item).contains(&value.to_text().to_lowercase())
        }
        Predicate::StartsWith(value) => {
            lower_text(item).starts_with(&value.to_text().to_lowercase())
        }
        Predicate::EndsWith(value) => lower_text(item).ends_with(&value.to_text().to_lowercase()),
        Predicate::GreaterThan(value) => number(item) > value.to_number(),
        Predicate::LessThan(value) => number(item) < value.to_number(),
        Predicate::Between { min, max } => {
            let n = number(item);
            let max = max.as_ref().map(Scalar::to_number).unwrap_or(f64::NAN);
            n >= min.to_number() && n <= max
        }
        Predicate::In(values) => contains_any(item, values),
        Predicate::NotIn(values) => !contains_any(item, values),
        Predicate::Unrecognized(op) => {
            trace!("Unrecognized operator {op} on {}, passing row", condition.column_key);
            true
        }
    }
}

/// True if the row satisfies every condition, vacuously true for no conditions.
pub fn matches_all<'c>(row: &Row, conditions: impl IntoIterator<Item = &'c Condition>) -> bool {
    conditions
        .into_iter()
        .all(|condition| matches_condition(row, condition))
}

/// Indices of the rows satisfying all conditions, in dataset order.
pub fn filter_indices<'c, C>(rows: &[Row], conditions: C) -> Vec<usize>
where
    C: IntoIterator<Item = &'c Condition>,
    C::IntoIter: Clone,
{
    let conditions = conditions.into_iter();
    let indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| matches_all(row, conditions.clone()))
        .map(|(idx, _)| idx)
        .collect();
    debug!(
        "{} of {} rows matched {} condition(s)",
        indices.len(),
        rows.len(),
        conditions.count()
    );
    indices
}

/// Rows satisfying all conditions. With no conditions every row is returned, in order.
pub fn apply_filters<'a>(rows: &'a [Row], conditions: &[Condition]) -> Vec<&'a Row> {
    if conditions.is_empty() {
        return rows.iter().collect();
    }
    filter_indices(rows, conditions)
        .into_iter()
        .map(|idx| &rows[idx])
        .collect()
}

fn strict_equals(item: Option<&FieldValue>, value: &Scalar) -> bool {
    match item {
        Some(FieldValue::Scalar(s)) => s.strict_eq(value),
        _ => false,
    }
}

fn lower_text(item: Option<&FieldValue>) -> String {
    item.map(FieldValue::to_text).unwrap_or_default().to_lowercase()
}

fn number(item: Option<&FieldValue>) -> f64 {
    item.map(FieldValue::to_number).unwrap_or(f64::NAN)
}

/// List fields match when any of their elements is in `values`.
fn contains_any(item: Option<&FieldValue>, values: &[Scalar]) -> bool {
    match item {
        Some(FieldValue::List(items)) => values
            .iter()
            .any(|v| items.iter().any(|i| i.same_value(v))),
        Some(FieldValue::Scalar(s)) => values.iter().any(|v| v.same_value(s)),
        None => false,
    }
}
