//! Quarry Query - Typed parameterized query execution
//!
//! This crate turns a SQL template with named placeholders into a
//! reusable command instance backed by the connection pool:
//!
//! - `parameters` - placeholder extraction and value binding
//! - `Query` - trait a domain query type implements (SQL template plus
//!   a bind function for its argument struct)
//! - `PreparedQuery` - the reusable command instance; builds its
//!   parameter shape once and leases a fresh connection per execution
//! - `QueryCursor` - forward-only row cursor that holds its connection
//!   lease until dropped

mod command;
mod cursor;
pub mod parameters;

#[cfg(test)]
mod tests;

pub use command::{ParameterValues, PreparedQuery, Query};
pub use cursor::QueryCursor;
pub use parameters::{BindError, BindResult, BoundQuery, RewrittenQuery};
