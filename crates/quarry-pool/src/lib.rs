//! Quarry Pool - Bounded connection pooling
//!
//! This crate provides a bounded, thread-safe database connection pool
//! with lease-on-acquire and return-on-drop semantics.
//!
//! # Example
//!
//! ```ignore
//! use quarry_pool::{ConnectionPool, PoolConfig};
//!
//! let config = PoolConfig::new(1, 20)
//!     .with_acquire_timeout_ms(5000)
//!     .with_idle_timeout_ms(300000);
//!
//! let pool = ConnectionPool::new(config, connection_factory);
//! let conn = pool.acquire().await?;
//! // Use connection...
//! // Connection returned to pool on drop
//! ```

mod config;
mod pool;
mod stats;


pub use config::PoolConfig;
pub use pool::{ConnectionFactory, ConnectionPool, PooledConnection};
pub use stats::PoolStats;
