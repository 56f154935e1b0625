//! INSERT statement builder, with `ON DUPLICATE KEY UPDATE` support

use std::fmt;

use crate::dialect::Dialect;

/// Fluent builder for INSERT statements.
///
/// Column/value pairs render in insertion order. Removing a column
/// retracts it from both the column list and the VALUES list; removing
/// a column that is not present is a no-op.
pub struct InsertBuilder<D: Dialect> {
    dialect: D,
    table: String,
    columns: Vec<(String, String)>,
}

impl<D: Dialect> InsertBuilder<D> {
    pub(crate) fn new(dialect: D, table: &str) -> Self {
        Self {
            dialect,
            table: table.to_string(),
            columns: Vec::new(),
        }
    }

    /// Add a column with a raw value expression.
    pub fn add(mut self, column: &str, value: &str) -> Self {
        self.columns.push((column.to_string(), value.to_string()));
        self
    }

    /// Add a column bound to an explicitly named parameter.
    pub fn add_param(mut self, column: &str, param: &str) -> Self {
        let value = self.dialect.param(param);
        self.columns.push((column.to_string(), value));
        self
    }

    /// Add columns each bound to a parameter named after the column.
    pub fn add_auto_param<'a, I>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for column in columns {
            let value = self.dialect.param(column);
            self.columns.push((column.to_string(), value));
        }
        self
    }

    /// Fully retract a column. No-op if the column is absent.
    pub fn remove(mut self, column: &str) -> Self {
        self.columns.retain(|(name, _)| name != column);
        self
    }

    /// Extend into an upsert (`INSERT ... ON DUPLICATE KEY UPDATE`).
    pub fn on_duplicate_key_update(self) -> InsertOnDuplicateKeyBuilder<D> {
        InsertOnDuplicateKeyBuilder {
            insert: self,
            updates: Vec::new(),
        }
    }

    /// Render the statement.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl<D: Dialect> fmt::Display for InsertBuilder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .columns
            .iter()
            .map(|(name, _)| self.dialect.quote(name))
            .collect();
        let values: Vec<&str> = self.columns.iter().map(|(_, v)| v.as_str()).collect();

        write!(
            f,
            "INSERT INTO {} ({}) VALUES ({})",
            self.dialect.quote(&self.table),
            names.join(","),
            values.join(",")
        )
    }
}

/// Upsert extension of [`InsertBuilder`].
///
/// Carries its own column/value list for the UPDATE clause; removing a
/// column here leaves the INSERT column list untouched.
pub struct InsertOnDuplicateKeyBuilder<D: Dialect> {
    insert: InsertBuilder<D>,
    updates: Vec<(String, String)>,
}

impl<D: Dialect> InsertOnDuplicateKeyBuilder<D> {
    /// Copy every column/value pair from the INSERT into the UPDATE
    /// clause. Typically followed by `remove` for key columns.
    pub fn add_from_insert(mut self) -> Self {
        self.updates.extend(self.insert.columns.iter().cloned());
        self
    }

    /// Add a column with a raw value expression to the UPDATE clause.
    pub fn add(mut self, column: &str, value: &str) -> Self {
        self.updates.push((column.to_string(), value.to_string()));
        self
    }

    /// Add a column bound to a parameter named after it.
    pub fn add_auto_param(mut self, column: &str) -> Self {
        let value = self.insert.dialect.param(column);
        self.updates.push((column.to_string(), value));
        self
    }

    /// Retract a column from the UPDATE clause. No-op if absent.
    pub fn remove(mut self, column: &str) -> Self {
        self.updates.retain(|(name, _)| name != column);
        self
    }

    /// Render the statement.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl<D: Dialect> fmt::Display for InsertOnDuplicateKeyBuilder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.insert)?;

        if !self.updates.is_empty() {
            let assignments: Vec<String> = self
                .updates
                .iter()
                .map(|(name, value)| format!("{}={}", self.insert.dialect.quote(name), value))
                .collect();
            write!(f, " ON DUPLICATE KEY UPDATE {}", assignments.join(","))?;
        }

        Ok(())
    }
}
