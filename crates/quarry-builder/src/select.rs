//! SELECT statement builder

use std::fmt;

use crate::dialect::Dialect;

/// Sort direction for `ORDER BY` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Fluent builder for SELECT statements.
///
/// Columns and clauses render in insertion order; identical call
/// sequences always produce identical SQL.
pub struct SelectBuilder<D: Dialect> {
    dialect: D,
    table: String,
    alias: Option<String>,
    distinct: bool,
    columns: Vec<String>,
    joins: Vec<String>,
    wheres: Vec<String>,
    order_by: Vec<String>,
    limit: Option<u64>,
}

impl<D: Dialect> SelectBuilder<D> {
    pub(crate) fn new(dialect: D, table: &str) -> Self {
        Self {
            dialect,
            table: table.to_string(),
            alias: None,
            distinct: false,
            columns: Vec::new(),
            joins: Vec::new(),
            wheres: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Alias the FROM table.
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Emit `SELECT DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Add column expressions to the projection.
    ///
    /// Expressions are emitted verbatim, so qualified references like
    /// `t.a` stay as written.
    pub fn add<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// INNER JOIN with a raw ON condition.
    pub fn inner_join(mut self, table: &str, alias: &str, condition: &str) -> Self {
        self.joins.push(format!(
            "INNER JOIN {} {} ON {}",
            self.dialect.quote(table),
            alias,
            condition
        ));
        self
    }

    /// INNER JOIN equating one column on the joined table with one on
    /// an already-joined table: `ON alias.column=other_alias.other_column`.
    pub fn inner_join_on_column(
        self,
        table: &str,
        alias: &str,
        column: &str,
        other_alias: &str,
        other_column: &str,
    ) -> Self {
        let condition = format!("{}.{}={}.{}", alias, column, other_alias, other_column);
        self.inner_join(table, alias, &condition)
    }

    /// Add a WHERE condition; conditions are AND-joined.
    pub fn and_where(mut self, condition: &str) -> Self {
        self.wheres.push(condition.to_string());
        self
    }

    /// Append an ORDER BY expression.
    pub fn order_by(mut self, expr: &str, order: Order) -> Self {
        let suffix = match order {
            Order::Asc => "",
            Order::Desc => " DESC",
        };
        self.order_by.push(format!("{}{}", expr, suffix));
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the statement.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl<D: Dialect> fmt::Display for SelectBuilder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }

        if self.columns.is_empty() {
            write!(f, "*")?;
        } else {
            write!(f, "{}", self.columns.join(","))?;
        }

        write!(f, " FROM {}", self.dialect.quote(&self.table))?;
        if let Some(alias) = &self.alias {
            write!(f, " {}", alias)?;
        }

        for join in &self.joins {
            write!(f, " {}", join)?;
        }

        if !self.wheres.is_empty() {
            write!(f, " WHERE {}", self.wheres.join(" AND "))?;
        }

        if !self.order_by.is_empty() {
            write!(f, " ORDER BY {}", self.order_by.join(","))?;
        }

        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }

        Ok(())
    }
}
