//! Reusable parameterized command instances
//!
//! A domain query type implements [`Query`] once: the SQL template and
//! a bind function for its argument struct. [`PreparedQuery`] wraps it
//! with the pool and handles parameter-shape caching, value ordering,
//! connection leasing, and timeouts for every execution.

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::OnceLock;
use std::time::Duration;

use quarry_core::{QuarryError, Result, Value};
use quarry_pool::ConnectionPool;

use crate::cursor::QueryCursor;
use crate::parameters::{BindError, BindResult, rewrite_named};

/// A domain query: one SQL template plus the binding logic for its
/// argument type.
///
/// The template's parameter shape (names, order) is derived from the
/// SQL text and must not depend on per-call input; only the bound
/// values vary between calls.
pub trait Query: Send + Sync {
    /// The value type bundling this query's per-call inputs.
    type Args: Send + Sync;

    /// The SQL template, with `@name` placeholders. Either a literal
    /// or text produced by a query builder.
    fn sql(&self) -> Cow<'_, str>;

    /// Write the per-call argument values into `values`.
    ///
    /// Must set every parameter the template declares, and nothing
    /// else; a name mismatch fails the execution before any
    /// connection is leased.
    fn bind(&self, args: &Self::Args, values: &mut ParameterValues<'_>) -> BindResult;
}

/// Call-local parameter values, checked against the cached shape.
///
/// Each execution gets its own `ParameterValues`, so concurrent calls
/// on the same command instance never clobber each other's arguments.
pub struct ParameterValues<'shape> {
    names: &'shape [String],
    values: Vec<Option<Value>>,
}

impl<'shape> ParameterValues<'shape> {
    fn new(names: &'shape [String]) -> Self {
        Self {
            values: vec![None; names.len()],
            names,
        }
    }

    /// Set the value for a declared parameter name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> BindResult {
        match self.names.iter().position(|n| n == name) {
            Some(idx) => {
                self.values[idx] = Some(value.into());
                Ok(())
            }
            None => Err(BindError::UnknownParameter(name.to_string())),
        }
    }

    /// The declared parameter names, in first-occurrence order.
    pub fn names(&self) -> &[String] {
        self.names
    }

    /// Flatten into driver order (one value per placeholder
    /// occurrence), failing on any unset parameter.
    fn into_ordered(self, order: &[String]) -> BindResult<Vec<Value>> {
        let mut ordered = Vec::with_capacity(order.len());
        for name in order {
            let idx = self
                .names
                .iter()
                .position(|n| n == name)
                .expect("placeholder order derives from declared names");
            match &self.values[idx] {
                Some(value) => ordered.push(value.clone()),
                None => return Err(BindError::MissingParameter(name.clone())),
            }
        }
        Ok(ordered)
    }
}

/// The cached parameter shape of a command instance. Built exactly
/// once, on first execution; immutable afterwards.
struct Shape {
    /// SQL with `?` placeholders, ready for the driver.
    sql: String,
    /// Parameter name per placeholder occurrence (repeats included).
    order: Vec<String>,
    /// Unique parameter names in first-occurrence order.
    declared: Vec<String>,
}

/// A reusable command instance bound to one SQL template.
///
/// The instance may serve many sequential or concurrently-nested
/// executions: each call leases its own connection from the pool and
/// binds its own call-local value set, while the parameter shape is
/// shared read-only.
pub struct PreparedQuery<Q: Query> {
    pool: Arc<ConnectionPool>,
    query: Q,
    timeout: Option<Duration>,
    shape: OnceLock<Shape>,
}

impl<Q: Query> PreparedQuery<Q> {
    /// Create a command instance on the given pool.
    pub fn new(pool: Arc<ConnectionPool>, query: Q) -> Self {
        Self {
            pool,
            query,
            timeout: None,
            shape: OnceLock::new(),
        }
    }

    /// Bound the wall-clock time of each statement execution.
    ///
    /// Without a timeout, executions wait as long as the driver does.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The underlying query.
    pub fn query(&self) -> &Q {
        &self.query
    }

    fn shape(&self) -> &Shape {
        self.shape.get_or_init(|| {
            let sql = self.query.sql();
            let rewritten = rewrite_named(&sql);
            let mut declared: Vec<String> = Vec::new();
            for name in &rewritten.names {
                if !declared.contains(name) {
                    declared.push(name.clone());
                }
            }
            tracing::debug!(
                parameters = declared.len(),
                "built parameter shape for command"
            );
            Shape {
                sql: rewritten.sql,
                order: rewritten.names,
                declared,
            }
        })
    }

    /// The declared parameter names, in first-occurrence order.
    ///
    /// Stable across executions for the lifetime of the instance.
    pub fn parameters(&self) -> &[String] {
        &self.shape().declared
    }

    fn bound_values(&self, args: &Q::Args) -> Result<Vec<Value>> {
        let shape = self.shape();
        let mut values = ParameterValues::new(&shape.declared);
        self.query
            .bind(args, &mut values)
            .map_err(|e| QuarryError::Bind(e.to_string()))?;
        values
            .into_ordered(&shape.order)
            .map_err(|e| QuarryError::Bind(e.to_string()))
    }

    async fn run<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match self.timeout {
            // A timed-out statement abandons the in-flight driver call;
            // the driver marks the session broken if its protocol state
            // is unrecoverable, and the pool discards it on return.
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .map_err(|_| QuarryError::Timeout(format!("statement exceeded {:?}", timeout)))?,
            None => fut.await,
        }
    }

    /// Execute a non-reading statement (INSERT/UPDATE/DELETE).
    ///
    /// Leases a connection for the duration of this call only; the
    /// lease is released before the row count is returned, success or
    /// failure.
    pub async fn execute(&self, args: &Q::Args) -> Result<u64> {
        let shape = self.shape();
        let params = self.bound_values(args)?;

        let lease = self.pool.acquire().await?;
        let affected = self.run(lease.execute(&shape.sql, &params)).await?;
        tracing::debug!(affected_rows = affected, "statement executed");
        Ok(affected)
    }

    /// Execute a reading statement (SELECT) and return a cursor over
    /// the result rows.
    ///
    /// The cursor owns the connection lease until it is dropped. A new
    /// `fetch` may be started from within an open cursor's row loop on
    /// the same instance; each call leases its own connection.
    pub async fn fetch(&self, args: &Q::Args) -> Result<QueryCursor<'_>> {
        let shape = self.shape();
        let params = self.bound_values(args)?;

        let lease = self.pool.acquire().await?;
        let result = self.run(lease.query(&shape.sql, &params)).await?;
        tracing::debug!(rows = result.row_count(), "query executed");
        Ok(QueryCursor::new(result, lease))
    }

    /// Execute a reading statement expected to produce a single value.
    pub async fn fetch_scalar(&self, args: &Q::Args) -> Result<Value> {
        let cursor = self.fetch(args).await?;
        cursor.into_scalar()
    }
}
