//! Shared data model: queries, raw records and shaped results.

pub mod fields;
mod query;
mod record;

pub use fields::{column_label, FORMULA_FIELD, IDENTIFIER_FIELD, SUMMARY_FIELDS};
pub use query::{Credential, Criteria, Query, SearchMode};
pub use record::{MaterialRecord, PropertyValue, ResultRow, ResultSet};
