//! Parameter objects placed in the `params` array of a request.

use serde::{Deserialize, Serialize};

use crate::training::{DbType, QuestionCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEmail {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOtp {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
}

impl Question {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// A question with the SQL that answers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSqlPair {
    pub question: String,
    pub sql: String,
    #[serde(default)]
    pub tag: QuestionCategory,
}

/// Single opaque string: DDL, documentation text, record ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringData {
    pub data: String,
}

impl StringData {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrganization {
    pub org_name: String,
    pub db_type: DbType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrganizationMember {
    pub org_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub visibility: bool,
}

/// Generated SQL with the text surrounding it in the raw model answer.
///
/// Also sent as a parameter when asking for an explanation of (or a question
/// for) existing SQL, with only `sql` filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlAnswer {
    #[serde(default)]
    pub raw_answer: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub postfix: String,
    #[serde(default)]
    pub sql: String,
}

impl SqlAnswer {
    pub fn for_sql(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Self::default()
        }
    }
}

/// A question, its SQL and a markdown preview of the rows it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataResult {
    pub question: String,
    pub sql: String,
    pub table_markdown: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub correction_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagForReview {
    pub question: String,
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub error_msg: Option<String>,
}
