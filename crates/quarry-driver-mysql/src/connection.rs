//! MySQL connection implementation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use mysql_async::{Conn, Row as MySqlRow, consts::ColumnType, prelude::*};
use quarry_core::{ColumnMeta, Connection, QuarryError, QueryResult, Result, Row, Value};
use quarry_pool::ConnectionFactory;
use tokio::sync::Mutex;

use crate::options::ConnectOptions;
use crate::values::{from_mysql_value, to_mysql_params};

/// One MySQL session.
///
/// The pool owns these exclusively per lease, so the inner `Conn` sits
/// behind a single async mutex that is never contended in practice.
pub struct MySqlConnection {
    conn: Mutex<Option<Conn>>,
    closed: AtomicBool,
    /// Set when the driver reports an I/O or protocol error. The pool
    /// discards broken connections instead of recycling them.
    broken: AtomicBool,
}

impl MySqlConnection {
    /// Open a new session against the given server.
    #[tracing::instrument(skip(options), fields(host = %options.host(), port = options.port()))]
    pub async fn connect(options: &ConnectOptions) -> Result<Self> {
        tracing::debug!(database = ?options.database(), "connecting to MySQL");

        let conn = Conn::new(options.to_mysql_opts())
            .await
            .map_err(|e| QuarryError::Connection(format!("Failed to connect to MySQL: {}", e)))?;

        tracing::info!("MySQL connection established");
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            closed: AtomicBool::new(false),
            broken: AtomicBool::new(false),
        })
    }

    /// Map a driver error, flagging the session broken on transport
    /// failures so the pool retires it.
    fn map_error(&self, context: &str, err: mysql_async::Error) -> QuarryError {
        match err {
            mysql_async::Error::Server(server_err) => {
                QuarryError::Query(format!("{}: {}", context, server_err))
            }
            other => {
                self.broken.store(true, Ordering::SeqCst);
                QuarryError::Connection(format!("{}: {}", context, other))
            }
        }
    }
}

#[async_trait]
impl Connection for MySqlConnection {
    fn driver_name(&self) -> &str {
        "mysql"
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or_else(|| QuarryError::Connection("Connection is closed".into()))?;

        conn.exec_drop(sql, to_mysql_params(params))
            .await
            .map_err(|e| self.map_error("Failed to execute statement", e))?;

        let affected_rows = conn.affected_rows();
        tracing::debug!(affected_rows = affected_rows, "statement executed");
        Ok(affected_rows)
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let start_time = std::time::Instant::now();

        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or_else(|| QuarryError::Connection("Connection is closed".into()))?;

        let mysql_rows: Vec<MySqlRow> = conn
            .exec(sql, to_mysql_params(params))
            .await
            .map_err(|e| self.map_error("Failed to execute query", e))?;

        let mut columns = Vec::new();
        let mut column_names = Vec::new();
        let mut column_types = Vec::new();

        if let Some(first_row) = mysql_rows.first() {
            for (idx, col) in first_row.columns_ref().iter().enumerate() {
                let name = col.name_str().to_string();
                column_names.push(name.clone());
                column_types.push(col.column_type());

                columns.push(ColumnMeta {
                    name,
                    data_type: format!("{:?}", col.column_type()),
                    nullable: true,
                    ordinal: idx,
                    max_length: Some(col.column_length() as i64),
                });
            }
        }

        let mut rows = Vec::with_capacity(mysql_rows.len());
        for mysql_row in mysql_rows {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                let mysql_val: mysql_async::Value =
                    mysql_row.get(idx).unwrap_or(mysql_async::Value::NULL);
                let col_type = column_types
                    .get(idx)
                    .copied()
                    .unwrap_or(ColumnType::MYSQL_TYPE_STRING);
                values.push(from_mysql_value(mysql_val, col_type));
            }
            rows.push(Row::new(column_names.clone(), values));
        }

        let execution_time_ms = start_time.elapsed().as_millis() as u64;
        tracing::debug!(
            row_count = rows.len(),
            execution_time_ms = execution_time_ms,
            "query executed"
        );

        Ok(QueryResult {
            id: uuid::Uuid::new_v4(),
            columns,
            rows,
            affected_rows: 0,
            execution_time_ms,
            warnings: Vec::new(),
        })
    }

    async fn ping(&self) -> Result<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or_else(|| QuarryError::Connection("Connection is closed".into()))?;
        conn.ping()
            .await
            .map_err(|e| self.map_error("Ping failed", e))
    }

    async fn close(&self) -> Result<()> {
        let conn = self.conn.lock().await.take();
        self.closed.store(true, Ordering::SeqCst);
        if let Some(conn) = conn {
            tracing::debug!("closing MySQL connection");
            conn.disconnect()
                .await
                .map_err(|e| {
                    QuarryError::Connection(format!("Failed to close MySQL connection: {}", e))
                })?;
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn is_broken(&self) -> bool {
        self.broken.load(Ordering::SeqCst)
    }
}

/// Opens MySQL sessions for a `quarry_pool::ConnectionPool`.
pub struct MySqlConnectionFactory {
    options: ConnectOptions,
}

impl MySqlConnectionFactory {
    pub fn new(options: ConnectOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl ConnectionFactory for MySqlConnectionFactory {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        let conn = MySqlConnection::connect(&self.options).await?;
        Ok(Arc::new(conn))
    }

    /// Probe liveness with a real round trip rather than only checking
    /// local flags; MySQL servers drop idle sessions after wait_timeout.
    async fn validate(&self, conn: &dyn Connection) -> bool {
        if conn.is_closed() || conn.is_broken() {
            return false;
        }
        conn.ping().await.is_ok()
    }
}
