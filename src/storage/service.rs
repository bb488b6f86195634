//! Row-oriented boundary to the backing data service.
//!
//! The store layer only ever talks to the database through this trait:
//! bulk fetch ordered by one column, insert, update by id, delete by id,
//! and a column-IN-set select for join-table lookups. Anything richer
//! (cascades, denormalization, rollback) is composed from these five
//! operations in [`crate::storage::OpsStore`].

use std::collections::BTreeMap;

use crate::error::Result;

/// A single stored value. The schema only uses text, integer and null
/// affinities; dates are stored as ISO-8601 text.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    Null,
    Integer(i64),
    Text(String),
}

impl RowValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RowValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RowValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for RowValue {
    fn from(s: &str) -> Self {
        RowValue::Text(s.to_string())
    }
}

impl From<String> for RowValue {
    fn from(s: String) -> Self {
        RowValue::Text(s)
    }
}

impl From<i64> for RowValue {
    fn from(n: i64) -> Self {
        RowValue::Integer(n)
    }
}

impl From<Option<String>> for RowValue {
    fn from(s: Option<String>) -> Self {
        match s {
            Some(s) => RowValue::Text(s),
            None => RowValue::Null,
        }
    }
}

/// One row as a column-name to value mapping.
pub type Row = BTreeMap<String, RowValue>;

/// Read a text column, treating absent and NULL alike.
pub fn text_column(row: &Row, column: &str) -> Option<String> {
    row.get(column)
        .and_then(RowValue::as_text)
        .map(str::to_string)
}

/// Read an integer column.
pub fn integer_column(row: &Row, column: &str) -> Option<i64> {
    row.get(column).and_then(RowValue::as_integer)
}

/// The external data service contract.
pub trait DataService {
    /// Fetch every row of `table`, ordered by `order_by` descending.
    fn fetch_all(&self, table: &str, order_by: &str) -> Result<Vec<Row>>;

    /// Insert one row.
    fn insert(&self, table: &str, row: &Row) -> Result<()>;

    /// Overwrite the named columns of the row with the given id.
    fn update(&self, table: &str, id: &str, changes: &Row) -> Result<()>;

    /// Delete the row with the given id.
    fn delete(&self, table: &str, id: &str) -> Result<()>;

    /// Select rows where `column` is one of `values`.
    fn select_in(&self, table: &str, column: &str, values: &[String]) -> Result<Vec<Row>>;
}
