//! Tests for parameter extraction and binding

use std::collections::HashMap;

use quarry_core::Value;

use super::binder::{BindError, bind_named, rewrite_named};
use super::extractor::{Parameter, ParameterStyle, extract_parameters, extract_parameters_with_style};

// =============================================================================
// Extractor tests
// =============================================================================

#[test]
fn test_extract_at_named() {
    let params = extract_parameters("SELECT * FROM accounts WHERE id = @id AND name = @name");
    assert_eq!(
        params,
        vec![
            Parameter::Named("id".into()),
            Parameter::Named("name".into())
        ]
    );
}

#[test]
fn test_extract_colon_named() {
    let params = extract_parameters("UPDATE accounts SET name = :name WHERE id = :id");
    assert_eq!(
        params,
        vec![
            Parameter::Named("name".into()),
            Parameter::Named("id".into())
        ]
    );
}

#[test]
fn test_extract_question_mark() {
    let result = extract_parameters_with_style("SELECT * FROM accounts WHERE id = ? AND rank > ?");
    assert_eq!(
        result.parameters,
        vec![Parameter::Positional(1), Parameter::Positional(2)]
    );
    assert_eq!(result.style, Some(ParameterStyle::QuestionMark));
}

#[test]
fn test_extract_deduplicates_repeated_names() {
    let params = extract_parameters("SELECT @low, @high, @low");
    assert_eq!(
        params,
        vec![
            Parameter::Named("low".into()),
            Parameter::Named("high".into())
        ]
    );
}

#[test]
fn test_extract_skips_string_literals_and_comments() {
    let sql = "SELECT name FROM t WHERE email = '@not_a_param' AND id = @id -- @comment\n/* @blocked */";
    let params = extract_parameters(sql);
    assert_eq!(params, vec![Parameter::Named("id".into())]);
}

#[test]
fn test_extract_mixed_styles() {
    let result = extract_parameters_with_style("SELECT @a WHERE b = :b");
    assert_eq!(result.style, Some(ParameterStyle::Mixed));
}

#[test]
fn test_extract_mixed_styles_keeps_occurrence_order() {
    let result = extract_parameters_with_style("UPDATE t SET a = :first WHERE b = @second");
    assert_eq!(
        result.parameters,
        vec![
            Parameter::Named("first".into()),
            Parameter::Named("second".into())
        ]
    );
    assert_eq!(result.style, Some(ParameterStyle::Mixed));
}

#[test]
fn test_extract_no_parameters() {
    let result = extract_parameters_with_style("SELECT 1");
    assert!(result.parameters.is_empty());
    assert!(result.style.is_none());
}

// =============================================================================
// Binder tests
// =============================================================================

#[test]
fn test_rewrite_named_to_question_marks() {
    let rewritten = rewrite_named("SELECT * FROM accounts WHERE id = @id AND name = @name");
    assert_eq!(
        rewritten.sql,
        "SELECT * FROM accounts WHERE id = ? AND name = ?"
    );
    assert_eq!(rewritten.names, vec!["id".to_string(), "name".to_string()]);
}

#[test]
fn test_rewrite_repeated_name_gets_one_placeholder_per_occurrence() {
    let rewritten = rewrite_named("SELECT @a + @b + @a");
    assert_eq!(rewritten.sql, "SELECT ? + ? + ?");
    assert_eq!(
        rewritten.names,
        vec!["a".to_string(), "b".to_string(), "a".to_string()]
    );
}

#[test]
fn test_rewrite_leaves_literals_untouched() {
    let rewritten = rewrite_named("SELECT '@kept' FROM t WHERE id = @id");
    assert_eq!(rewritten.sql, "SELECT '@kept' FROM t WHERE id = ?");
    assert_eq!(rewritten.names, vec!["id".to_string()]);
}

#[test]
fn test_bind_named_orders_values() {
    let mut params = HashMap::new();
    params.insert("id".to_string(), Value::Int64(42));
    params.insert("name".to_string(), Value::String("Alice".into()));

    let bound = bind_named(
        "SELECT * FROM accounts WHERE name = @name AND id = @id",
        &params,
    )
    .expect("bind");
    assert_eq!(bound.sql, "SELECT * FROM accounts WHERE name = ? AND id = ?");
    assert_eq!(
        bound.values,
        vec![Value::String("Alice".into()), Value::Int64(42)]
    );
}

#[test]
fn test_bind_named_repeats_value_per_occurrence() {
    let mut params = HashMap::new();
    params.insert("a".to_string(), Value::Int64(7));

    let bound = bind_named("SELECT @a + @a", &params).expect("bind");
    assert_eq!(bound.values, vec![Value::Int64(7), Value::Int64(7)]);
}

#[test]
fn test_bind_named_missing_parameter() {
    let params = HashMap::new();
    let err = bind_named("SELECT @missing", &params).expect_err("should fail");
    assert_eq!(err, BindError::MissingParameter("missing".into()));
}
