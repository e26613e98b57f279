//! Configuration driven row filtering.
//!
//! A [Schema] declares the filterable columns, a [FilterSession] holds the conditions a user
//! composes over them, and [eval] decides which rows pass. [FilterModel] ties the session to
//! a schema and a row dataset fetched from outside.

pub mod condition;
pub mod error;
pub mod eval;
pub mod operator;
pub mod row;
pub mod schema;
pub mod session;
pub mod source;
pub mod value;

pub use condition::{Condition, ConditionId, ConditionRecord, Predicate};
pub use error::{ConditionError, DataError, SchemaError};
pub use eval::{apply_filters, filter_indices, matches_all, matches_condition};
pub use operator::{default_operators, effective_operators, Arity, Operator};
pub use row::Row;
pub use schema::{Column, ColumnOption, Schema, ValueType};
pub use session::FilterSession;
pub use source::{FilterModel, Loadable, OneShotFlags, RowSource, SchemaSource, StaticRows, StaticSchema};
pub use value::{FieldValue, Scalar};
