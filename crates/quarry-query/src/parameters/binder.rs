//! SQL Parameter Binder
//!
//! Rewrites SQL templates with named placeholders (`@name`, `:name`)
//! into the `?` positional form MySQL drivers bind against, and maps
//! named values into driver order.

use std::collections::HashMap;

use quarry_core::Value;
use thiserror::Error;

use super::extractor::named_occurrences;

/// Errors that can occur during parameter binding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A declared parameter was not given a value.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// A value was supplied for a name the template does not declare.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Parameter count mismatch for positional binding.
    #[error("expected {expected} parameters, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },
}

/// Result type for parameter binding operations.
pub type BindResult<T = ()> = Result<T, BindError>;

/// A SQL template rewritten to `?` placeholders.
///
/// `names` lists the parameter name behind each `?` in placeholder
/// order; a name reused in the template appears once per occurrence.
#[derive(Debug, Clone)]
pub struct RewrittenQuery {
    /// The SQL with named placeholders converted to `?`.
    pub sql: String,
    /// Parameter names in placeholder order, repeats included.
    pub names: Vec<String>,
}

/// Result of binding named parameters to a SQL template.
#[derive(Debug, Clone)]
pub struct BoundQuery {
    /// The SQL with named placeholders converted to `?`.
    pub sql: String,
    /// The bound values in placeholder order.
    pub values: Vec<Value>,
}

/// Rewrites `@name`/`:name` placeholders to `?`.
///
/// Placeholders inside string literals and comments are left alone.
/// The same name may appear several times; each occurrence becomes its
/// own `?` and its own entry in `names`, so the value is sent once per
/// occurrence.
///
/// # Example
///
/// ```
/// use quarry_query::parameters::rewrite_named;
///
/// let rewritten = rewrite_named("SELECT * FROM accounts WHERE id = @id AND name = @name");
/// assert_eq!(rewritten.sql, "SELECT * FROM accounts WHERE id = ? AND name = ?");
/// assert_eq!(rewritten.names, vec!["id".to_string(), "name".to_string()]);
/// ```
pub fn rewrite_named(sql: &str) -> RewrittenQuery {
    let occurrences = named_occurrences(sql);

    let mut result = String::with_capacity(sql.len());
    let mut names = Vec::with_capacity(occurrences.len());
    let mut last_end = 0;

    for (start, end, name) in occurrences {
        result.push_str(&sql[last_end..start]);
        result.push('?');
        names.push(name);
        last_end = end;
    }

    result.push_str(&sql[last_end..]);

    RewrittenQuery { sql: result, names }
}

/// Binds named parameter values to a SQL template in one step.
///
/// Convenience over [`rewrite_named`] for callers that carry their
/// values in a map. Fails if the template declares a name the map does
/// not contain.
///
/// # Example
///
/// ```
/// use quarry_query::parameters::bind_named;
/// use quarry_core::Value;
/// use std::collections::HashMap;
///
/// let mut params = HashMap::new();
/// params.insert("id".to_string(), Value::Int64(42));
///
/// let bound = bind_named("SELECT * FROM accounts WHERE id = @id", &params).unwrap();
/// assert_eq!(bound.sql, "SELECT * FROM accounts WHERE id = ?");
/// assert_eq!(bound.values, vec![Value::Int64(42)]);
/// ```
pub fn bind_named(sql: &str, params: &HashMap<String, Value>) -> BindResult<BoundQuery> {
    let rewritten = rewrite_named(sql);

    let mut values = Vec::with_capacity(rewritten.names.len());
    for name in &rewritten.names {
        match params.get(name) {
            Some(value) => values.push(value.clone()),
            None => return Err(BindError::MissingParameter(name.clone())),
        }
    }

    Ok(BoundQuery {
        sql: rewritten.sql,
        values,
    })
}
