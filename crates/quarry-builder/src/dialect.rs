//! SQL dialect hooks consumed by the builders
//!
//! A dialect supplies the syntax knobs that vary between database
//! vendors: identifier quoting and parameter placeholder rendering.
//! Builders hold a dialect by value; implementations are expected to
//! be small copyable tokens.

/// Vendor-specific syntax rules.
pub trait Dialect: Copy + Send + Sync + 'static {
    /// Quote an identifier (table or column name).
    fn quote(&self, identifier: &str) -> String;

    /// Render a bound-parameter placeholder for `name`.
    fn param(&self, name: &str) -> String;
}

/// MySQL syntax: backtick-quoted identifiers, `@name` placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MySql;

impl Dialect for MySql {
    fn quote(&self, identifier: &str) -> String {
        // Embedded backticks are doubled, per MySQL quoting rules
        format!("`{}`", identifier.replace('`', "``"))
    }

    fn param(&self, name: &str) -> String {
        format!("@{}", name)
    }
}
