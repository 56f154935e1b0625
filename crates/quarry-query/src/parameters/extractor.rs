//! SQL Parameter Extractor
//!
//! Extracts parameter placeholders from SQL templates. Placeholders
//! inside string literals and comments are ignored.

use regex::Regex;
use std::sync::LazyLock;

/// A parameter extracted from a SQL template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// A named parameter like `@name` or `:name`.
    Named(String),
    /// A positional parameter (`?`), numbered from 1.
    Positional(usize),
}

impl Parameter {
    /// Returns the parameter name if this is a named parameter.
    pub fn name(&self) -> Option<&str> {
        match self {
            Parameter::Named(name) => Some(name),
            Parameter::Positional(_) => None,
        }
    }

    /// Returns the position if this is a positional parameter.
    pub fn position(&self) -> Option<usize> {
        match self {
            Parameter::Named(_) => None,
            Parameter::Positional(pos) => Some(*pos),
        }
    }

    /// Returns true if this is a named parameter.
    pub fn is_named(&self) -> bool {
        matches!(self, Parameter::Named(_))
    }
}

/// The style of parameter placeholder detected in the SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterStyle {
    /// At-sign-prefixed named parameters (`@name`) - MySQL, SQL Server
    AtNamed,
    /// Colon-prefixed named parameters (`:name`) - Oracle, SQLite
    ColonNamed,
    /// Question mark positional parameters (`?`) - JDBC, MySQL drivers
    QuestionMark,
    /// Mixed styles in one template
    Mixed,
}

/// Result of parameter extraction containing both parameters and detected style.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted parameters in order of first occurrence.
    pub parameters: Vec<Parameter>,
    /// The detected parameter style (or Mixed if multiple styles are used).
    pub style: Option<ParameterStyle>,
}

// Lazy-compiled regex patterns for parameter extraction
static AT_NAMED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([a-zA-Z_][a-zA-Z0-9_]*)").expect("valid regex"));

static COLON_NAMED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-zA-Z_][a-zA-Z0-9_]*)").expect("valid regex"));

static QUESTION_MARK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?").expect("valid regex"));

// Regex to identify string literals and comments that should be skipped
static STRING_LITERAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'(?:[^'\\]|\\.)*'|--[^\n]*|/\*[\s\S]*?\*/").expect("valid regex")
});

/// Extracts parameters from a SQL template.
///
/// Named parameters are returned once each, in order of first
/// occurrence. Placeholders inside string literals and comments are
/// ignored.
pub fn extract_parameters(sql: &str) -> Vec<Parameter> {
    extract_parameters_with_style(sql).parameters
}

/// Extracts parameters from a SQL template with style detection.
pub fn extract_parameters_with_style(sql: &str) -> ExtractionResult {
    // Blank out string literals and comments so placeholders inside
    // them are not extracted. The mask preserves byte offsets.
    let masked_sql = mask_strings_and_comments(sql);

    let mut parameters: Vec<Parameter> = Vec::new();
    let mut seen: std::collections::HashSet<Parameter> = std::collections::HashSet::new();
    let mut styles_found: Vec<ParameterStyle> = Vec::new();

    // Named placeholders come back sorted by byte offset, so a mixed
    // `:x ... @y` template keeps first-occurrence ordering.
    for (start, _, name) in named_occurrences(sql) {
        let style = if masked_sql.as_bytes()[start] == b'@' {
            ParameterStyle::AtNamed
        } else {
            ParameterStyle::ColonNamed
        };
        if !styles_found.contains(&style) {
            styles_found.push(style);
        }

        let param = Parameter::Named(name);
        if seen.insert(param.clone()) {
            parameters.push(param);
        }
    }

    // Each ? is a separate positional parameter
    let question_count = QUESTION_MARK_REGEX.find_iter(&masked_sql).count();
    if question_count > 0 {
        for i in 1..=question_count {
            let param = Parameter::Positional(i);
            if seen.insert(param.clone()) {
                parameters.push(param);
            }
        }
        if !styles_found.contains(&ParameterStyle::QuestionMark) {
            styles_found.push(ParameterStyle::QuestionMark);
        }
    }

    let style = match styles_found.len() {
        0 => None,
        1 => Some(styles_found[0]),
        _ => Some(ParameterStyle::Mixed),
    };

    ExtractionResult { parameters, style }
}

/// Find every named placeholder occurrence in order of appearance,
/// including repeats, as `(start, end, name)` byte ranges into `sql`.
pub(crate) fn named_occurrences(sql: &str) -> Vec<(usize, usize, String)> {
    let masked_sql = mask_strings_and_comments(sql);
    let mut matches: Vec<(usize, usize, String)> = Vec::new();

    for cap in AT_NAMED_REGEX.captures_iter(&masked_sql) {
        if let (Some(full), Some(name)) = (cap.get(0), cap.get(1)) {
            matches.push((full.start(), full.end(), name.as_str().to_string()));
        }
    }

    for cap in COLON_NAMED_REGEX.captures_iter(&masked_sql) {
        if let (Some(full), Some(name)) = (cap.get(0), cap.get(1)) {
            matches.push((full.start(), full.end(), name.as_str().to_string()));
        }
    }

    matches.sort_by_key(|(start, _, _)| *start);
    matches
}

/// Masks string literals and comments in SQL with spaces.
///
/// This prevents parameter extraction from finding placeholders within
/// string literals or comments.
fn mask_strings_and_comments(sql: &str) -> String {
    STRING_LITERAL_REGEX
        .replace_all(sql, |caps: &regex::Captures| " ".repeat(caps[0].len()))
        .into_owned()
}
