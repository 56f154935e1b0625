//! Tests for prepared queries, cursors, and lease accounting

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use quarry_core::{ColumnMeta, Connection, QuarryError, QueryResult, Result, Row, Value};
use quarry_pool::{ConnectionFactory, ConnectionPool, PoolConfig};

use crate::command::{ParameterValues, PreparedQuery, Query};
use crate::parameters::BindResult;

/// Mock connection that evaluates arithmetic queries.
///
/// `query` returns a single row whose only column is the sum of the
/// bound integer parameters; `execute` reports one affected row.
struct MathConnection {
    closed: AtomicBool,
    query_delay: Option<Duration>,
}

impl MathConnection {
    fn new(query_delay: Option<Duration>) -> Self {
        Self {
            closed: AtomicBool::new(false),
            query_delay,
        }
    }
}

#[async_trait]
impl Connection for MathConnection {
    fn driver_name(&self) -> &str {
        "math-mock"
    }

    async fn execute(&self, _sql: &str, _params: &[Value]) -> Result<u64> {
        Ok(1)
    }

    async fn query(&self, _sql: &str, params: &[Value]) -> Result<QueryResult> {
        if let Some(delay) = self.query_delay {
            tokio::time::sleep(delay).await;
        }
        let sum: i64 = params.iter().filter_map(|v| v.as_i64()).sum();
        let mut result = QueryResult::empty();
        result.columns = vec![ColumnMeta {
            name: "value".into(),
            ..Default::default()
        }];
        result.rows = vec![Row::new(vec!["value".into()], vec![Value::Int64(sum)])];
        Ok(result)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct MathFactory {
    query_delay: Option<Duration>,
}

#[async_trait]
impl ConnectionFactory for MathFactory {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        Ok(Arc::new(MathConnection::new(self.query_delay)))
    }
}

fn math_pool(max_size: usize) -> Arc<ConnectionPool> {
    Arc::new(ConnectionPool::new(
        PoolConfig::new(0, max_size),
        MathFactory { query_delay: None },
    ))
}

/// `a + b + c` over three bound integers.
struct SumQuery;

impl Query for SumQuery {
    type Args = (i64, i64, i64);

    fn sql(&self) -> Cow<'_, str> {
        Cow::Borrowed("SELECT @a + @b + @c")
    }

    fn bind(&self, args: &Self::Args, values: &mut ParameterValues<'_>) -> BindResult {
        values.set("a", args.0)?;
        values.set("b", args.1)?;
        values.set("c", args.2)
    }
}

#[tokio::test]
async fn test_scalar_round_trip_repeatable() {
    let pool = math_pool(4);
    let sum = PreparedQuery::new(pool.clone(), SumQuery);

    for _ in 0..100 {
        let value = sum.fetch_scalar(&(5, 10, 15)).await.expect("scalar");
        assert_eq!(value.as_i64(), Some(30));
        // One live connection serves every sequential execution
        assert_eq!(pool.stats().total(), 1);
        assert_eq!(pool.stats().active(), 0);
    }
}

#[tokio::test]
async fn test_repeated_placeholder_binds_value_per_occurrence() {
    struct DoubleQuery;

    impl Query for DoubleQuery {
        type Args = i64;

        fn sql(&self) -> Cow<'_, str> {
            Cow::Borrowed("SELECT @a + @a")
        }

        fn bind(&self, args: &Self::Args, values: &mut ParameterValues<'_>) -> BindResult {
            values.set("a", *args)
        }
    }

    let double = PreparedQuery::new(math_pool(2), DoubleQuery);
    let value = double.fetch_scalar(&21).await.expect("scalar");
    assert_eq!(value.as_i64(), Some(42));
}

#[tokio::test]
async fn test_execute_releases_lease_before_return() {
    struct TouchQuery;

    impl Query for TouchQuery {
        type Args = i64;

        fn sql(&self) -> Cow<'_, str> {
            Cow::Borrowed("UPDATE t SET x = @x")
        }

        fn bind(&self, args: &Self::Args, values: &mut ParameterValues<'_>) -> BindResult {
            values.set("x", *args)
        }
    }

    let pool = math_pool(2);
    let touch = PreparedQuery::new(pool.clone(), TouchQuery);

    let affected = touch.execute(&1).await.expect("execute");
    assert_eq!(affected, 1);
    assert_eq!(pool.stats().active(), 0);
    assert_eq!(pool.stats().idle(), 1);
}

#[tokio::test]
async fn test_parameter_shape_immutable_across_executions() {
    let pool = math_pool(2);
    let sum = PreparedQuery::new(pool.clone(), SumQuery);

    assert_eq!(sum.parameters(), ["a", "b", "c"]);

    let first = sum.fetch_scalar(&(1, 2, 3)).await.expect("scalar");
    assert_eq!(first.as_i64(), Some(6));
    assert_eq!(sum.parameters(), ["a", "b", "c"]);

    // A second call binds fresh values; nothing leaks across calls
    let second = sum.fetch_scalar(&(100, 200, 300)).await.expect("scalar");
    assert_eq!(second.as_i64(), Some(600));
    assert_eq!(sum.parameters(), ["a", "b", "c"]);
}

#[tokio::test]
async fn test_nested_cursors_take_independent_leases() {
    for depth in [1usize, 3, 50] {
        let pool = math_pool(64);
        let sum = PreparedQuery::new(pool.clone(), SumQuery);

        let mut cursors = Vec::new();
        for level in 1..=depth {
            let cursor = sum.fetch(&(1, 2, 3)).await.expect("fetch");
            cursors.push(cursor);
            assert_eq!(pool.stats().active(), level);
        }

        // Close inner cursors before outer ones; the count steps down
        while let Some(cursor) = cursors.pop() {
            drop(cursor);
            assert_eq!(pool.stats().active(), cursors.len());
        }

        // Fully drained back to the free list
        let stats = pool.stats();
        assert_eq!(stats.active(), 0);
        assert_eq!(stats.total(), stats.idle());
    }
}

#[tokio::test]
async fn test_fetch_from_within_open_cursor_row_loop() {
    let pool = math_pool(4);
    let sum = PreparedQuery::new(pool.clone(), SumQuery);

    let mut outer = sum.fetch(&(1, 1, 1)).await.expect("outer fetch");
    assert_eq!(pool.stats().active(), 1);

    while let Some(row) = outer.next_row() {
        assert_eq!(row.get(0).and_then(Value::as_i64), Some(3));

        // Same command instance, new execution, independent lease
        let inner = sum.fetch(&(2, 2, 2)).await.expect("inner fetch");
        assert_eq!(pool.stats().active(), 2);
        assert_eq!(inner.into_scalar().expect("inner scalar").as_i64(), Some(6));
        assert_eq!(pool.stats().active(), 1);
    }

    drop(outer);
    assert_eq!(pool.stats().active(), 0);
}

#[tokio::test]
async fn test_unknown_parameter_fails_before_leasing() {
    struct WrongNameQuery;

    impl Query for WrongNameQuery {
        type Args = i64;

        fn sql(&self) -> Cow<'_, str> {
            Cow::Borrowed("SELECT @a")
        }

        fn bind(&self, args: &Self::Args, values: &mut ParameterValues<'_>) -> BindResult {
            values.set("b", *args)
        }
    }

    let pool = math_pool(2);
    let query = PreparedQuery::new(pool.clone(), WrongNameQuery);

    let err = query.fetch_scalar(&1).await.expect_err("shape mismatch");
    assert!(matches!(err, QuarryError::Bind(_)));
    // No connection was leased or created for the failed bind
    assert_eq!(pool.stats().total(), 0);
}

#[tokio::test]
async fn test_unset_parameter_fails_before_leasing() {
    struct ForgetfulQuery;

    impl Query for ForgetfulQuery {
        type Args = i64;

        fn sql(&self) -> Cow<'_, str> {
            Cow::Borrowed("SELECT @a + @b")
        }

        fn bind(&self, args: &Self::Args, values: &mut ParameterValues<'_>) -> BindResult {
            values.set("a", *args)
        }
    }

    let pool = math_pool(2);
    let query = PreparedQuery::new(pool.clone(), ForgetfulQuery);

    let err = query.fetch_scalar(&1).await.expect_err("missing value");
    assert!(matches!(err, QuarryError::Bind(_)));
    assert_eq!(pool.stats().total(), 0);
}

#[tokio::test]
async fn test_statement_timeout_releases_lease() {
    let pool = Arc::new(ConnectionPool::new(
        PoolConfig::new(0, 2),
        MathFactory {
            query_delay: Some(Duration::from_millis(200)),
        },
    ));
    let sum = PreparedQuery::new(pool.clone(), SumQuery).with_timeout(Duration::from_millis(20));

    let err = sum.fetch_scalar(&(1, 2, 3)).await.expect_err("timeout");
    assert!(matches!(err, QuarryError::Timeout(_)));
    assert_eq!(pool.stats().active(), 0);
}
