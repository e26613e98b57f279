//! Schema and row suppliers, and the model tying them to a filter session.

use log::{debug, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::condition::Condition;
use crate::error::{DataError, SchemaError};
use crate::eval::filter_indices;
use crate::row::Row;
use crate::schema::Schema;
use crate::session::FilterSession;

/// Load state of a remote resource.
#[derive(Debug)]
pub enum Loadable<T, E> {
    Loading,
    Ready(T),
    Failed(E),
}

impl<T, E> Loadable<T, E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Loadable::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Supplies the column schema.
pub trait SchemaSource {
    /// Start fetching, or start over if a fetch is in flight. Safe to call repeatedly.
    fn reload(&mut self);
    /// Advance the fetch. Returns the result exactly once when it settles.
    /// Must be called periodically, for example each frame, and should not block.
    fn poll(&mut self) -> Option<Result<Schema, SchemaError>>;
}

/// Supplies the full row dataset.
pub trait RowSource {
    /// Start fetching, or start over if a fetch is in flight. Safe to call repeatedly.
    fn reload(&mut self);
    /// Advance the fetch. Returns the result exactly once when it settles.
    fn poll(&mut self) -> Option<Result<Vec<Row>, DataError>>;
}

/// Schema known up front, settles on the first poll after each reload.
pub struct StaticSchema {
    schema: Schema,
    pending: bool,
}

impl StaticSchema {
    pub fn new(schema: Schema) -> Self {
        StaticSchema {
            schema,
            pending: false,
        }
    }
}

impl SchemaSource for StaticSchema {
    fn reload(&mut self) {
        self.pending = true;
    }

    fn poll(&mut self) -> Option<Result<Schema, SchemaError>> {
        if !std::mem::take(&mut self.pending) {
            return None;
        }
        Some(Ok(self.schema.clone()))
    }
}

/// Rows held in memory, settle on the first poll after each reload.
pub struct StaticRows {
    rows: Vec<Row>,
    pending: bool,
}

impl StaticRows {
    pub fn new(rows: Vec<Row>) -> Self {
        StaticRows {
            rows,
            pending: false,
        }
    }
}

impl RowSource for StaticRows {
    fn reload(&mut self) {
        self.pending = true;
    }

    fn poll(&mut self) -> Option<Result<Vec<Row>, DataError>> {
        if !std::mem::take(&mut self.pending) {
            return None;
        }
        Some(Ok(self.rows.clone()))
    }
}

/// One shot flags: set during one [FilterModel::poll] or [FilterModel::apply] call,
/// cleared at the start of the next poll.
#[derive(Default, Copy, Clone, Debug)]
pub struct OneShotFlags {
    /// Set once a schema was received and accepted.
    pub schema_loaded: bool,
    /// Set once a row dataset replaced the previous one.
    pub rows_loaded: bool,
    /// Set once the visible row set was recomputed.
    pub filtered: bool,
    /// Set once a schema or row fetch failed.
    pub load_failed: bool,
}

/// Schema, rows, the filter session and the currently visible rows.
pub struct FilterModel<S, R> {
    schema_source: S,
    row_source: R,
    schema: Loadable<Arc<Schema>, SchemaError>,
    rows: Loadable<Vec<Row>, DataError>,
    session: FilterSession,
    /// Conditions in effect for `visible`, as of the last apply.
    applied: Vec<Condition>,
    visible: Vec<usize>,
    flags: OneShotFlags,
}

impl<S: SchemaSource, R: RowSource> FilterModel<S, R> {
    /// Create the model and start fetching schema and rows.
    pub fn new(mut schema_source: S, mut row_source: R) -> Self {
        schema_source.reload();
        row_source.reload();
        FilterModel {
            schema_source,
            row_source,
            schema: Loadable::Loading,
            rows: Loadable::Loading,
            session: FilterSession::default(),
            applied: vec![],
            visible: vec![],
            flags: OneShotFlags::default(),
        }
    }

    /// Drive both sources. Must be called periodically, for example each frame.
    pub fn poll(&mut self) {
        self.flags = OneShotFlags::default();

        if let Some(result) = self.schema_source.poll() {
            match result {
                Ok(schema) => {
                    self.schema = Loadable::Ready(Arc::new(schema));
                    self.flags.schema_loaded = true;
                }
                Err(e) => {
                    warn!("Schema load failed: {e}");
                    self.schema = Loadable::Failed(e);
                    self.flags.load_failed = true;
                }
            }
            self.check_schema_fields();
            self.session.set_schema(self.schema.ready().cloned());
        }

        if let Some(result) = self.row_source.poll() {
            match result {
                Ok(rows) => {
                    debug!("Loaded {} rows", rows.len());
                    self.rows = Loadable::Ready(rows);
                    self.flags.rows_loaded = true;
                    self.check_schema_fields();
                    self.session.set_schema(self.schema.ready().cloned());
                    self.refilter();
                }
                Err(e) => {
                    warn!("Data load failed: {e}");
                    self.rows = Loadable::Failed(e);
                    self.visible.clear();
                    self.flags.load_failed = true;
                }
            }
        }
    }

    /// Re-fetch the row dataset. Conditions are kept, the last applied filter is re-run on
    /// the new rows.
    pub fn reload_rows(&mut self) {
        self.rows = Loadable::Loading;
        self.visible.clear();
        self.row_source.reload();
    }

    pub fn reload_schema(&mut self) {
        self.schema = Loadable::Loading;
        self.session.set_schema(None);
        self.schema_source.reload();
    }

    /// Run the session's conditions against the full dataset.
    pub fn apply(&mut self) {
        self.applied = self.session.snapshot();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = match self.rows.ready() {
            Some(rows) => filter_indices(rows, &self.applied),
            None => vec![],
        };
        self.flags.filtered = true;
    }

    fn check_schema_fields(&mut self) {
        let (Some(schema), Some(rows)) = (self.schema.ready(), self.rows.ready()) else {
            return;
        };
        if rows.is_empty() {
            return;
        }
        let fields: BTreeSet<&str> = rows.iter().flat_map(Row::field_names).collect();
        if let Err(e) = schema.ensure_fields(fields) {
            warn!("Schema does not fit the row dataset: {e}");
            self.schema = Loadable::Failed(e);
            self.flags.load_failed = true;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.schema.is_loading() || self.rows.is_loading()
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.ready().map(|s| s.as_ref())
    }

    pub fn schema_error(&self) -> Option<&SchemaError> {
        self.schema.error()
    }

    pub fn data_error(&self) -> Option<&DataError> {
        self.rows.error()
    }

    pub fn session(&self) -> &FilterSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut FilterSession {
        &mut self.session
    }

    /// Full dataset, unfiltered.
    pub fn rows(&self) -> &[Row] {
        self.rows.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices into [Self::rows] that passed the last applied filter.
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_rows(&self) -> impl ExactSizeIterator<Item = &Row> {
        let rows = self.rows();
        self.visible.iter().map(move |idx| &rows[*idx])
    }

    pub fn applied_conditions(&self) -> &[Condition] {
        &self.applied
    }

    pub fn flags(&self) -> &OneShotFlags {
        &self.flags
    }

    pub fn schema_source_mut(&mut self) -> &mut S {
        &mut self.schema_source
    }

    pub fn row_source_mut(&mut self) -> &mut R {
        &mut self.row_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Predicate;
    use crate::schema::{Column, ValueType};

    /// Row source that fails until told otherwise.
    struct Flaky {
        fail: bool,
        pending: bool,
        rows: Vec<Row>,
    }

    impl RowSource for Flaky {
        fn reload(&mut self) {
            self.pending = true;
        }

        fn poll(&mut self) -> Option<Result<Vec<Row>, DataError>> {
            if !std::mem::take(&mut self.pending) {
                return None;
            }
            if self.fail {
                Some(Err(DataError::Fetch("connection refused".to_string())))
            } else {
                Some(Ok(self.rows.clone()))
            }
        }
    }

    fn schema() -> Schema {
        Schema::new([Column::new("valor", "Amount", ValueType::Number)]).unwrap()
    }

    fn rows() -> Vec<Row> {
        [5.0, 50.0, 500.0]
            .into_iter()
            .map(|v| Row::new().with("valor", v))
            .collect()
    }

    #[test]
    fn loads_then_shows_everything() {
        let mut model = FilterModel::new(StaticSchema::new(schema()), StaticRows::new(rows()));
        assert!(model.is_loading());
        assert!(model.session_mut().add_condition().is_none());
        model.poll();
        assert!(!model.is_loading());
        assert!(model.flags().schema_loaded && model.flags().rows_loaded);
        assert_eq!(model.visible_indices(), &[0, 1, 2]);
        model.poll();
        assert!(!model.flags().rows_loaded);
    }

    #[test]
    fn filtering_waits_for_apply() {
        let mut model = FilterModel::new(StaticSchema::new(schema()), StaticRows::new(rows()));
        model.poll();
        let id = model.session_mut().add_condition().unwrap();
        model
            .session_mut()
            .set_predicate(&id, Predicate::GreaterThan(10.0.into()));
        assert_eq!(model.visible_rows().len(), 3);
        model.apply();
        assert_eq!(model.visible_indices(), &[1, 2]);
        assert!(model.flags().filtered);
    }

    #[test]
    fn reload_keeps_conditions_and_reapplies() {
        let mut model = FilterModel::new(StaticSchema::new(schema()), StaticRows::new(rows()));
        model.poll();
        let id = model.session_mut().add_condition().unwrap();
        model
            .session_mut()
            .set_predicate(&id, Predicate::LessThan(100.0.into()));
        model.apply();
        model.reload_rows();
        assert!(model.is_loading());
        assert_eq!(model.visible_rows().len(), 0);
        model.poll();
        assert_eq!(model.session().len(), 1);
        assert_eq!(model.visible_indices(), &[0, 1]);
    }

    #[test]
    fn data_error_discards_results_and_retry_recovers() {
        let source = Flaky {
            fail: true,
            pending: false,
            rows: rows(),
        };
        let mut model = FilterModel::new(StaticSchema::new(schema()), source);
        model.poll();
        assert!(matches!(model.data_error(), Some(DataError::Fetch(_))));
        assert!(model.flags().load_failed);
        assert_eq!(model.visible_rows().len(), 0);

        model.row_source_mut().fail = false;
        model.reload_rows();
        model.reload_rows();
        model.poll();
        assert!(model.data_error().is_none());
        assert_eq!(model.visible_rows().len(), 3);
    }

    #[test]
    fn schema_must_match_row_fields() {
        let bad = Schema::new([Column::new("price", "Price", ValueType::Number)]).unwrap();
        let mut model = FilterModel::new(StaticSchema::new(bad), StaticRows::new(rows()));
        model.poll();
        assert!(matches!(
            model.schema_error(),
            Some(SchemaError::UnknownField(key)) if key == "price"
        ));
        assert!(model.schema().is_none());
        assert!(model.session_mut().add_condition().is_none());
    }
}
