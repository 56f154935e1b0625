//! DELETE statement builder

use std::fmt;

use crate::dialect::Dialect;

/// Fluent builder for DELETE statements.
pub struct DeleteBuilder<D: Dialect> {
    dialect: D,
    table: String,
    wheres: Vec<String>,
    limit: Option<u64>,
}

impl<D: Dialect> DeleteBuilder<D> {
    pub(crate) fn new(dialect: D, table: &str) -> Self {
        Self {
            dialect,
            table: table.to_string(),
            wheres: Vec::new(),
            limit: None,
        }
    }

    /// Add a WHERE condition; conditions are AND-joined.
    pub fn and_where(mut self, condition: &str) -> Self {
        self.wheres.push(condition.to_string());
        self
    }

    /// Cap the number of deleted rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the statement.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl<D: Dialect> fmt::Display for DeleteBuilder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.dialect.quote(&self.table))?;

        if !self.wheres.is_empty() {
            write!(f, " WHERE {}", self.wheres.join(" AND "))?;
        }

        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }

        Ok(())
    }
}
