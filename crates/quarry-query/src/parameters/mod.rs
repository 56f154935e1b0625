//! SQL Parameter Extraction and Binding
//!
//! This module provides utilities for extracting and binding parameters
//! from SQL templates. It supports the parameter styles MySQL callers
//! commonly use:
//!
//! - Named parameters: `@name`, `:name`
//! - Positional parameters: `?`
//!
//! # Example
//!
//! ```
//! use quarry_query::parameters::{extract_parameters, Parameter};
//!
//! let sql = "SELECT * FROM accounts WHERE id = @id";
//! let params = extract_parameters(sql);
//! // Returns [Named("id")]
//! ```

pub mod binder;
mod extractor;

pub use binder::{BindError, BindResult, BoundQuery, RewrittenQuery, bind_named, rewrite_named};
pub use extractor::{
    ExtractionResult, Parameter, ParameterStyle, extract_parameters, extract_parameters_with_style,
};

#[cfg(test)]
mod tests;
