//! Connection trait

use crate::{QueryResult, Result, Value};
use async_trait::async_trait;

/// A live database session.
///
/// A connection is owned exclusively by one pool lease at a time; the
/// pool never hands the same connection to two callers concurrently.
/// Implementations therefore do not need to support concurrent calls,
/// only `Send + Sync` ownership transfer between threads.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "mysql")
    fn driver_name(&self) -> &str;

    /// Execute a statement that modifies data (INSERT/UPDATE/DELETE).
    ///
    /// Returns the number of rows affected. Parameters are bound
    /// positionally against `?` placeholders in the SQL text.
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Execute a query that returns rows (SELECT)
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Check that the session is still alive.
    ///
    /// Used by the pool to validate idle connections before handing
    /// them out, so callers never receive a known-dead session.
    async fn ping(&self) -> Result<()>;

    /// Close the connection
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;

    /// Whether the driver reported a fatal error on this session.
    ///
    /// A broken connection is discarded by the pool instead of being
    /// recycled into the free list.
    fn is_broken(&self) -> bool {
        false
    }
}
