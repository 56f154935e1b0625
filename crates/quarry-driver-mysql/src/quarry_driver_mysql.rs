//! MySQL driver adapter
//!
//! Implements `quarry_core::Connection` over one `mysql_async::Conn`
//! per pooled connection, and a `quarry_pool::ConnectionFactory` that
//! opens them from a `ConnectOptions`.

mod connection;
mod options;
mod values;

pub use connection::{MySqlConnection, MySqlConnectionFactory};
pub use options::ConnectOptions;
