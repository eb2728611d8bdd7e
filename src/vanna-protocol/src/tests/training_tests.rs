//! Tests for training enums.

use pretty_assertions::assert_eq;
use serde_json::json;

use crate::training::*;

#[test]
fn test_question_category_wire_names() {
    let cases = [
        (QuestionCategory::ManuallyTrained, "Manually Trained"),
        (QuestionCategory::SqlRan, "SQL Ran Successfully"),
        (QuestionCategory::FlaggedForReview, "Flagged for Review"),
        (QuestionCategory::BootstrapTrainingQuery, "Bootstrap Training Query"),
    ];
    for (category, name) in cases {
        assert_eq!(serde_json::to_value(category).unwrap(), json!(name));
        assert_eq!(category.to_string(), name);
        let parsed: QuestionCategory = serde_json::from_value(json!(name)).unwrap();
        assert_eq!(parsed, category);
    }
}

#[test]
fn test_db_type_parsing_is_case_insensitive() {
    assert_eq!(DbType::from("snowflake"), DbType::Snowflake);
    assert_eq!(DbType::from("BigQuery"), DbType::BigQuery);
    assert_eq!(DbType::from("postgresql"), DbType::Postgres);
    assert_eq!(DbType::from("DuckDB"), DbType::Other("DuckDB".to_string()));
}

#[test]
fn test_db_type_serializes_canonical_name() {
    assert_eq!(serde_json::to_value(DbType::from("SNOWFLAKE")).unwrap(), json!("Snowflake"));
    assert_eq!(serde_json::to_value(DbType::Other("Oracle".into())).unwrap(), json!("Oracle"));
}
