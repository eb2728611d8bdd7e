//! Objects found in the `result` field of a response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outcome of a mutating call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgList {
    #[serde(default)]
    pub organizations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionStringList {
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotlyResult {
    pub plotly_code: String,
}

/// A table serialized by the service as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFrameJson {
    pub data: String,
}

/// One question/SQL example in [`TrainingData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSqlExample {
    pub question: String,
    pub sql: String,
}

/// Context retrieved for a question: similar pairs, DDL and documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingData {
    #[serde(default)]
    pub questions: Vec<QuestionSqlExample>,
    #[serde(default)]
    pub ddl: Vec<String>,
    #[serde(default)]
    pub documentation: Vec<String>,
}

impl TrainingData {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty() && self.ddl.is_empty() && self.documentation.is_empty()
    }
}

/// Count of questions per category for the current model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyStats {
    pub num_questions: u64,
    #[serde(default)]
    pub data: BTreeMap<String, u64>,
}
