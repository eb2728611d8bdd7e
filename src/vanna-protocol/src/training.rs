//! Enumerations describing training records and models.

use serde::{Deserialize, Serialize};

/// Tag stored alongside a question/SQL pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuestionCategory {
    #[default]
    #[serde(rename = "Manually Trained")]
    ManuallyTrained,
    #[serde(rename = "SQL Ran Successfully")]
    SqlRan,
    #[serde(rename = "No SQL Generated")]
    NoSqlGenerated,
    #[serde(rename = "SQL Unable to Run")]
    SqlUnableToRun,
    #[serde(rename = "Bootstrap Training Query")]
    BootstrapTrainingQuery,
    #[serde(rename = "Assumed Correct")]
    AssumedCorrect,
    #[serde(rename = "Flagged for Review")]
    FlaggedForReview,
    #[serde(rename = "Reviewed and Approved")]
    ReviewedAndApproved,
    #[serde(rename = "Reviewed and Rejected")]
    ReviewedAndRejected,
    #[serde(rename = "Reviewed and Updated")]
    ReviewedAndUpdated,
}

impl QuestionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::ManuallyTrained => "Manually Trained",
            QuestionCategory::SqlRan => "SQL Ran Successfully",
            QuestionCategory::NoSqlGenerated => "No SQL Generated",
            QuestionCategory::SqlUnableToRun => "SQL Unable to Run",
            QuestionCategory::BootstrapTrainingQuery => "Bootstrap Training Query",
            QuestionCategory::AssumedCorrect => "Assumed Correct",
            QuestionCategory::FlaggedForReview => "Flagged for Review",
            QuestionCategory::ReviewedAndApproved => "Reviewed and Approved",
            QuestionCategory::ReviewedAndRejected => "Reviewed and Rejected",
            QuestionCategory::ReviewedAndUpdated => "Reviewed and Updated",
        }
    }
}

impl std::fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warehouse a model is attached to, recorded at model creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DbType {
    Snowflake,
    BigQuery,
    Postgres,
    Other(String),
}

impl DbType {
    pub fn as_str(&self) -> &str {
        match self {
            DbType::Snowflake => "Snowflake",
            DbType::BigQuery => "BigQuery",
            DbType::Postgres => "Postgres",
            DbType::Other(name) => name,
        }
    }
}

impl From<String> for DbType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "snowflake" => DbType::Snowflake,
            "bigquery" => DbType::BigQuery,
            "postgres" | "postgresql" => DbType::Postgres,
            _ => DbType::Other(value),
        }
    }
}

impl From<&str> for DbType {
    fn from(value: &str) -> Self {
        DbType::from(value.to_string())
    }
}

impl From<DbType> for String {
    fn from(value: DbType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
