//! Connection pool implementation

use std::collections::VecDeque;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use quarry_core::{Connection, QuarryError, QueryResult, Result, Value};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::PoolConfig;
use crate::stats::PoolStats;

/// Factory trait for creating new connections
#[async_trait]
pub trait ConnectionFactory: Send + Sync + 'static {
    /// Create and open a new connection
    async fn create(&self) -> Result<Arc<dyn Connection>>;

    /// Validate that an idle connection is still usable before it is
    /// handed out again.
    ///
    /// Default implementation rejects closed and broken connections.
    /// Drivers may override this with a liveness probe (ping).
    async fn validate(&self, conn: &dyn Connection) -> bool {
        !conn.is_closed() && !conn.is_broken()
    }
}

#[async_trait]
impl<T: ConnectionFactory> ConnectionFactory for Arc<T> {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        (**self).create().await
    }

    async fn validate(&self, conn: &dyn Connection) -> bool {
        (**self).validate(conn).await
    }
}

/// Internal wrapper for idle connections with recycling metadata
struct IdleConnection {
    connection: Arc<dyn Connection>,
    created_at: Instant,
    last_used_at: Instant,
}

impl IdleConnection {
    fn new(connection: Arc<dyn Connection>) -> Self {
        let now = Instant::now();
        Self {
            connection,
            created_at: now,
            last_used_at: now,
        }
    }

    fn recycled(mut self) -> Self {
        self.last_used_at = Instant::now();
        self
    }
}

/// Decrements the waiting counter on every exit path of `acquire`.
struct WaitingGuard<'a>(&'a AtomicUsize);

impl<'a> WaitingGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A bounded, thread-safe pool of database connections.
///
/// The pool hands out exclusive leases via [`ConnectionPool::acquire`]
/// and takes connections back when the [`PooledConnection`] wrapper is
/// dropped. Total live connections never exceed the configured maximum;
/// when the pool is exhausted, `acquire` waits up to the configured
/// acquire timeout and then fails with a pool-exhausted error.
pub struct ConnectionPool {
    /// Pool configuration
    config: PoolConfig,
    /// Connection factory
    factory: Arc<dyn ConnectionFactory>,
    /// Available idle connections
    idle: Mutex<VecDeque<IdleConnection>>,
    /// Semaphore bounding total leases
    semaphore: Arc<Semaphore>,
    /// Number of connections currently leased out
    active_count: AtomicUsize,
    /// Number of requests waiting for a connection
    waiting_count: AtomicUsize,
    /// Set once by `close`; no new leases after this
    closed: AtomicBool,
}

impl ConnectionPool {
    /// Create a new connection pool with the given configuration and factory
    pub fn new<F: ConnectionFactory>(config: PoolConfig, factory: F) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_size()));
        Self {
            config,
            factory: Arc::new(factory),
            idle: Mutex::new(VecDeque::new()),
            semaphore,
            active_count: AtomicUsize::new(0),
            waiting_count: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Acquire an exclusive lease on a connection.
    ///
    /// This will:
    /// 1. Try to reuse an idle connection (after validation)
    /// 2. If none is available and the pool is under `max_size`, open a new one
    /// 3. If at `max_size`, wait for a connection to be returned
    ///
    /// Fails with [`QuarryError::PoolTimeout`] when no connection becomes
    /// available within the configured acquire timeout, and with
    /// [`QuarryError::Connection`] when opening a new connection fails.
    /// A failed open never places a broken entry in the free list.
    pub async fn acquire(&self) -> Result<PooledConnection<'_>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(QuarryError::PoolClosed);
        }

        let _waiting = WaitingGuard::new(&self.waiting_count);

        let result = tokio::time::timeout(self.config.acquire_timeout(), async {
            // The permit bounds total leases; it travels with the lease
            // and is released when the lease drops.
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| QuarryError::PoolClosed)?;

            let connection = match self.checkout_idle().await {
                Some(conn) => conn,
                None => {
                    tracing::debug!("pool has no idle connection, opening a new one");
                    // On failure the permit drops here, releasing capacity.
                    self.factory.create().await?
                }
            };

            self.active_count.fetch_add(1, Ordering::SeqCst);

            Ok(PooledConnection {
                connection: Some(connection),
                pool: self,
                _permit: permit,
            })
        })
        .await;

        match result {
            Ok(lease) => lease,
            Err(_) => Err(QuarryError::PoolTimeout(format!(
                "no connection became available within {:?}",
                self.config.acquire_timeout()
            ))),
        }
    }

    /// Pop idle connections until one passes lifetime, idle-timeout,
    /// and validation checks. Stale entries are closed and discarded.
    async fn checkout_idle(&self) -> Option<Arc<dyn Connection>> {
        loop {
            let entry = { self.idle.lock().pop_front() };

            match entry {
                Some(idle) => {
                    if let Some(max_lifetime) = self.config.max_lifetime() {
                        if idle.created_at.elapsed() > max_lifetime {
                            tracing::debug!("discarding connection past max lifetime");
                            let _ = idle.connection.close().await;
                            continue;
                        }
                    }

                    if idle.last_used_at.elapsed() > self.config.idle_timeout() {
                        tracing::debug!("discarding connection idle past timeout");
                        let _ = idle.connection.close().await;
                        continue;
                    }

                    if !self.factory.validate(&*idle.connection).await {
                        tracing::debug!("discarding connection that failed validation");
                        let _ = idle.connection.close().await;
                        continue;
                    }

                    return Some(idle.connection);
                }
                None => return None,
            }
        }
    }

    /// Return a leased connection to the free list.
    ///
    /// Closed or broken connections are discarded rather than recycled;
    /// dropping the last handle tears the session down.
    fn return_connection(&self, connection: Arc<dyn Connection>) {
        let prev = self.active_count.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(prev > 0, "lease returned to a pool with no active leases");

        if self.closed.load(Ordering::SeqCst) {
            tracing::debug!("pool closed, dropping returned connection");
            return;
        }

        if connection.is_closed() || connection.is_broken() {
            tracing::debug!(
                broken = connection.is_broken(),
                "discarding returned connection"
            );
            return;
        }

        let mut idle = self.idle.lock();
        idle.push_back(IdleConnection::new(connection).recycled());
    }

    /// Get current pool statistics
    pub fn stats(&self) -> PoolStats {
        let idle = self.idle.lock().len();
        let active = self.active_count.load(Ordering::SeqCst);
        let waiting = self.waiting_count.load(Ordering::SeqCst);
        PoolStats::new(idle + active, idle, active, waiting, self.config.max_size())
    }

    /// Get the pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Whether the pool has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Close idle connections beyond the configured minimum size
    pub async fn close_idle(&self) {
        let drained: Vec<_> = {
            let mut idle = self.idle.lock();
            let keep = self.config.min_size().min(idle.len());
            idle.split_off(keep).into_iter().collect()
        };

        for entry in drained {
            let _ = entry.connection.close().await;
        }
    }

    /// Close the pool.
    ///
    /// Every idle connection is closed, blocked acquirers are woken with
    /// a pool-closed error, and subsequent `acquire` calls fail. In-flight
    /// leases become invalid: statement execution on them fails with
    /// [`QuarryError::PoolClosed`], and on return their connections are
    /// discarded instead of pooled.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.semaphore.close();

        let drained: Vec<_> = {
            let mut idle = self.idle.lock();
            idle.drain(..).collect()
        };

        let count = drained.len();
        for entry in drained {
            let _ = entry.connection.close().await;
        }
        tracing::info!(closed_idle = count, "connection pool closed");
    }
}

/// An exclusive lease on a pooled connection.
///
/// When dropped, the connection is automatically returned to the pool.
/// Drop-based release makes double release unrepresentable.
pub struct PooledConnection<'a> {
    connection: Option<Arc<dyn Connection>>,
    pool: &'a ConnectionPool,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection<'_> {
    type Target = dyn Connection;

    fn deref(&self) -> &Self::Target {
        self.connection.as_ref().expect("connection taken").as_ref()
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.connection.take() {
            self.pool.return_connection(conn);
        }
    }
}

impl PooledConnection<'_> {
    /// Get the underlying connection as an Arc
    pub fn inner(&self) -> &Arc<dyn Connection> {
        self.connection.as_ref().expect("connection taken")
    }

    /// Fails once the owning pool has been closed; a lease held across
    /// `close` must not keep executing statements.
    fn ensure_pool_open(&self) -> Result<()> {
        if self.pool.is_closed() {
            return Err(QuarryError::PoolClosed);
        }
        Ok(())
    }

    /// Execute a non-reading statement on the leased connection.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.ensure_pool_open()?;
        self.inner().execute(sql, params).await
    }

    /// Execute a reading statement on the leased connection.
    pub async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        self.ensure_pool_open()?;
        self.inner().query(sql, params).await
    }

    /// Probe liveness of the leased connection.
    pub async fn ping(&self) -> Result<()> {
        self.ensure_pool_open()?;
        self.inner().ping().await
    }
}

impl fmt::Debug for PooledConnection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledConnection")
            .field(
                "driver",
                &self.connection.as_ref().map(|c| c.driver_name()),
            )
            .finish_non_exhaustive()
    }
}
