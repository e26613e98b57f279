use indexmap::IndexMap;
use log::{trace, warn};
use std::sync::Arc;

use crate::condition::{Condition, ConditionId, Predicate};
use crate::eval::filter_indices;
use crate::operator::{effective_operators, Operator};
use crate::row::Row;
use crate::schema::Schema;

/// Conditions being authored by one user, in creation order.
///
/// Editing never filters anything by itself, [FilterSession::apply] has to be called
/// explicitly so that half edited conditions do not narrow the table.
#[derive(Clone, Debug)]
pub struct FilterSession {
    schema: Option<Arc<Schema>>,
    conditions: IndexMap<ConditionId, Condition>,
    /// `None` once the sequence is used up, adding is refused from then on.
    next_id: Option<u64>,
}

impl Default for FilterSession {
    fn default() -> Self {
        FilterSession {
            schema: None,
            conditions: IndexMap::new(),
            next_id: Some(0),
        }
    }
}

impl FilterSession {
    pub fn new(schema: Arc<Schema>) -> Self {
        FilterSession {
            schema: Some(schema),
            ..Default::default()
        }
    }

    /// Session restored from existing conditions, new ids continue after the largest
    /// sequence id. Named ids never collide with allocated ones.
    pub fn with_conditions(
        schema: Option<Arc<Schema>>,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> Self {
        let conditions: IndexMap<ConditionId, Condition> =
            conditions.into_iter().map(|c| (c.id.clone(), c)).collect();
        let next_id = match conditions.keys().filter_map(ConditionId::seq).max() {
            Some(last) => last.checked_add(1),
            None => Some(0),
        };
        if next_id.is_none() {
            warn!("Restored condition ids use up the sequence, new conditions cannot be added");
        }
        FilterSession {
            schema,
            conditions,
            next_id,
        }
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    /// Swap the schema, existing conditions are kept as they are.
    pub fn set_schema(&mut self, schema: Option<Arc<Schema>>) {
        self.schema = schema;
    }

    /// Append a default condition for the first column.
    /// Returns `None` when no schema is available or the id sequence is used up.
    pub fn add_condition(&mut self) -> Option<ConditionId> {
        let column = self.schema.as_ref()?.first()?;
        let Some(seq) = self.next_id else {
            warn!("No condition ids left");
            return None;
        };
        self.next_id = seq.checked_add(1);
        let id = ConditionId::Seq(seq);
        let condition = Condition::new(id.clone(), column);
        trace!("Add condition {id} on {}", condition.column_key);
        self.conditions.insert(id.clone(), condition);
        Some(id)
    }

    /// Replace the condition with the given id, no-op if there is none.
    pub fn update_condition(&mut self, id: &ConditionId, condition: Condition) {
        if let Some(existing) = self.conditions.get_mut(id) {
            *existing = Condition {
                id: id.clone(),
                ..condition
            };
        }
    }

    pub fn remove_condition(&mut self, id: &ConditionId) {
        self.conditions.shift_remove(id);
    }

    pub fn clear_all(&mut self) {
        self.conditions.clear();
    }

    /// Point a condition at another column, resetting its operator to the column's first
    /// one and its operand to empty.
    pub fn change_column(&mut self, id: &ConditionId, column_key: &str) {
        let Some(column) = self.schema.as_ref().and_then(|s| s.column(column_key)) else {
            warn!("Condition {id}: unknown column {column_key}");
            return;
        };
        let replacement = Condition::new(id.clone(), column);
        self.update_condition(id, replacement);
    }

    /// Switch the operator, carrying the operand over when its shape allows.
    pub fn change_operator(&mut self, id: &ConditionId, op: Operator) {
        if let Some(condition) = self.conditions.get_mut(id) {
            condition.predicate = condition.predicate.with_operator(op);
        }
    }

    pub fn set_predicate(&mut self, id: &ConditionId, predicate: Predicate) {
        if let Some(condition) = self.conditions.get_mut(id) {
            condition.predicate = predicate;
        }
    }

    pub fn get(&self, id: &ConditionId) -> Option<&Condition> {
        self.conditions.get(id)
    }

    pub fn conditions(&self) -> impl ExactSizeIterator<Item = &Condition> + Clone {
        self.conditions.values()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Operators offered for a condition given its current column.
    pub fn operators_for(&self, id: &ConditionId) -> &[Operator] {
        self.conditions
            .get(id)
            .and_then(|c| self.schema.as_ref()?.column(&c.column_key))
            .map(effective_operators)
            .unwrap_or(&[])
    }

    /// Run every condition against `rows`, returning the indices of the matching rows.
    pub fn apply(&self, rows: &[Row]) -> Vec<usize> {
        filter_indices(rows, self.conditions.values())
    }

    /// Copy of the current conditions, e.g. to keep what was last applied.
    pub fn snapshot(&self) -> Vec<Condition> {
        self.conditions.values().cloned().collect()
    }
}
