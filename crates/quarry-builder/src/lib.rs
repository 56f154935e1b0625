//! Quarry Builder - Dialect-aware fluent SQL assembly
//!
//! Builders accumulate clause fragments in insertion order and render
//! deterministic SQL text for a target dialect. Each statement kind
//! exposes only the clauses legal for it.
//!
//! # Example
//!
//! ```
//! use quarry_builder::QueryBuilder;
//!
//! let sql = QueryBuilder::mysql()
//!     .delete("myTable")
//!     .and_where("`a`=5")
//!     .limit(1)
//!     .to_sql();
//! assert_eq!(sql, "DELETE FROM `myTable` WHERE `a`=5 LIMIT 1");
//! ```

mod delete;
mod dialect;
mod insert;
mod select;
mod update;

#[cfg(test)]
mod tests;

pub use delete::DeleteBuilder;
pub use dialect::{Dialect, MySql};
pub use insert::{InsertBuilder, InsertOnDuplicateKeyBuilder};
pub use select::{Order, SelectBuilder};
pub use update::UpdateBuilder;

/// Entry point tying builders to a dialect.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<D: Dialect> {
    dialect: D,
}

impl QueryBuilder<MySql> {
    /// A builder for MySQL syntax (backtick quoting, `@name`
    /// parameters, `ON DUPLICATE KEY UPDATE`).
    pub fn mysql() -> Self {
        Self::new(MySql)
    }
}

impl<D: Dialect> QueryBuilder<D> {
    /// Create a builder for the given dialect.
    pub fn new(dialect: D) -> Self {
        Self { dialect }
    }

    /// Start a SELECT statement.
    pub fn select(&self, table: &str) -> SelectBuilder<D> {
        SelectBuilder::new(self.dialect, table)
    }

    /// Start an INSERT statement.
    pub fn insert(&self, table: &str) -> InsertBuilder<D> {
        InsertBuilder::new(self.dialect, table)
    }

    /// Start an UPDATE statement.
    pub fn update(&self, table: &str) -> UpdateBuilder<D> {
        UpdateBuilder::new(self.dialect, table)
    }

    /// Start a DELETE statement.
    pub fn delete(&self, table: &str) -> DeleteBuilder<D> {
        DeleteBuilder::new(self.dialect, table)
    }
}
