//! UPDATE statement builder

use std::fmt;

use crate::dialect::Dialect;

/// Fluent builder for UPDATE statements.
pub struct UpdateBuilder<D: Dialect> {
    dialect: D,
    table: String,
    assignments: Vec<(String, String)>,
    wheres: Vec<String>,
    limit: Option<u64>,
}

impl<D: Dialect> UpdateBuilder<D> {
    pub(crate) fn new(dialect: D, table: &str) -> Self {
        Self {
            dialect,
            table: table.to_string(),
            assignments: Vec::new(),
            wheres: Vec::new(),
            limit: None,
        }
    }

    /// Assign a column a raw value expression.
    pub fn set(mut self, column: &str, value: &str) -> Self {
        self.assignments
            .push((column.to_string(), value.to_string()));
        self
    }

    /// Assign columns each from a parameter named after the column.
    pub fn add_auto_param<'a, I>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for column in columns {
            let value = self.dialect.param(column);
            self.assignments.push((column.to_string(), value));
        }
        self
    }

    /// Retract an assignment. No-op if the column is absent.
    pub fn remove(mut self, column: &str) -> Self {
        self.assignments.retain(|(name, _)| name != column);
        self
    }

    /// Add a WHERE condition; conditions are AND-joined.
    pub fn and_where(mut self, condition: &str) -> Self {
        self.wheres.push(condition.to_string());
        self
    }

    /// Cap the number of updated rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the statement.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl<D: Dialect> fmt::Display for UpdateBuilder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assignments: Vec<String> = self
            .assignments
            .iter()
            .map(|(name, value)| format!("{}={}", self.dialect.quote(name), value))
            .collect();

        write!(
            f,
            "UPDATE {} SET {}",
            self.dialect.quote(&self.table),
            assignments.join(",")
        )?;

        if !self.wheres.is_empty() {
            write!(f, " WHERE {}", self.wheres.join(" AND "))?;
        }

        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }

        Ok(())
    }
}
