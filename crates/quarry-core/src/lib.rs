//! Quarry Core - Shared abstractions for the Quarry persistence stack
//!
//! This crate provides the fundamental traits and types that the pool,
//! query, and driver crates depend on. It defines:
//!
//! - `Connection` - Trait for database connections
//! - `Value`, `Row`, `ColumnMeta`, `QueryResult` - Common data types
//! - `QuarryError` - The error taxonomy shared across the stack

mod connection;
mod error;
mod types;

pub use connection::*;
pub use error::*;
pub use types::*;
