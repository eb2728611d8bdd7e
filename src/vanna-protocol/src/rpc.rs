//! RPC envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Remote procedures exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    // Unauthenticated
    SendOtp,
    VerifyOtp,

    // Models
    ListOrgs,
    CreateOrg,
    AddUserToOrg,
    UpdateOrgVisibility,

    // Training corpus
    StoreSql,
    StoreDdl,
    StoreDocumentation,
    RemoveSql,
    RemoveTrainingData,
    FlagSqlForReview,
    GetTrainingData,
    GetAllQuestions,
    GetRelatedTrainingData,
    GetAccuracyStats,

    // Generation
    GenerateSqlFromQuestion,
    GenerateMetaFromQuestion,
    GenerateQuestion,
    GenerateQuestions,
    GenerateFollowupQuestions,
    GenerateExplanation,
    GeneratePlotlyCode,
}

impl Method {
    /// Method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::SendOtp => "send_otp",
            Method::VerifyOtp => "verify_otp",
            Method::ListOrgs => "list_orgs",
            Method::CreateOrg => "create_org",
            Method::AddUserToOrg => "add_user_to_org",
            Method::UpdateOrgVisibility => "update_org_visibility",
            Method::StoreSql => "store_sql",
            Method::StoreDdl => "store_ddl",
            Method::StoreDocumentation => "store_documentation",
            Method::RemoveSql => "remove_sql",
            Method::RemoveTrainingData => "remove_training_data",
            Method::FlagSqlForReview => "flag_sql_for_review",
            Method::GetTrainingData => "get_training_data",
            Method::GetAllQuestions => "get_all_questions",
            Method::GetRelatedTrainingData => "get_related_training_data",
            Method::GetAccuracyStats => "get_accuracy_stats",
            Method::GenerateSqlFromQuestion => "generate_sql_from_question",
            Method::GenerateMetaFromQuestion => "generate_meta_from_question",
            Method::GenerateQuestion => "generate_question",
            Method::GenerateQuestions => "generate_questions",
            Method::GenerateFollowupQuestions => "generate_followup_questions",
            Method::GenerateExplanation => "generate_explanation",
            Method::GeneratePlotlyCode => "generate_plotly_code",
        }
    }

    /// Whether the method is served by the unauthenticated endpoint.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Method::SendOtp | Method::VerifyOtp)
    }

    /// Whether the method is independent of the selected model.
    pub fn is_model_agnostic(&self) -> bool {
        matches!(
            self,
            Method::SendOtp
                | Method::VerifyOtp
                | Method::ListOrgs
                | Method::CreateOrg
                | Method::AddUserToOrg
        )
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcRequest {
    /// Build a request from already-serialized parameter objects.
    pub fn new(method: Method, params: Vec<Value>) -> Self {
        Self {
            method: method.as_str().to_string(),
            params,
        }
    }
}

/// Error object returned instead of a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

/// Response body. Exactly one of `result` / `error` is expected, but both
/// are optional so a malformed answer can still be reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct RpcResponse<T> {
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

impl<T> RpcResponse<T> {
    /// Message describing why no result came back.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(err) if !err.message.is_empty() => err.message.clone(),
            Some(err) => match err.code {
                Some(code) => format!("error code {code}"),
                None => "unknown error".to_string(),
            },
            None => "response carried no result".to_string(),
        }
    }
}
