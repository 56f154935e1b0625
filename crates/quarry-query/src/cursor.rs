//! Forward-only result cursors

use quarry_core::{ColumnMeta, QuarryError, QueryResult, Result, Row, Value};
use quarry_pool::PooledConnection;

/// A forward-only, single-pass sequence of result rows.
///
/// The cursor owns its connection lease; dropping the cursor releases
/// the connection back to the pool. A cursor cannot outlive the pool
/// it was leased from.
pub struct QueryCursor<'a> {
    columns: Vec<ColumnMeta>,
    rows: std::vec::IntoIter<Row>,
    _lease: PooledConnection<'a>,
}

impl<'a> QueryCursor<'a> {
    pub(crate) fn new(result: QueryResult, lease: PooledConnection<'a>) -> Self {
        Self {
            columns: result.columns,
            rows: result.rows.into_iter(),
            _lease: lease,
        }
    }

    /// Column metadata for the result set.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Advance to the next row, or `None` once the result is drained.
    pub fn next_row(&mut self) -> Option<Row> {
        self.rows.next()
    }

    /// Consume the cursor, expecting exactly one value in one row.
    pub fn into_scalar(mut self) -> Result<Value> {
        let row = self
            .rows
            .next()
            .ok_or_else(|| QuarryError::Query("query returned no rows".into()))?;
        row.get(0)
            .cloned()
            .ok_or_else(|| QuarryError::Query("query returned an empty row".into()))
    }
}

impl Iterator for QueryCursor<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.next_row()
    }
}
