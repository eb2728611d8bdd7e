//! Model-scoped facade over the RPC service.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use vanna_common::{MODEL_ENV_VAR, ModelName, Result, VannaConfig, VannaError, slugify};
use vanna_connectors::SqlRunner;
use vanna_protocol::{
    AccuracyStats, DataFrame, DataFrameJson, DataResult, DbType, Explanation, FlagForReview,
    Method, NewOrganization, NewOrganizationMember, OrgList, PlotlyResult, Question,
    QuestionCategory, QuestionSqlPair, QuestionStringList, SqlAnswer, Status, StringData,
    TrainingData, Visibility,
};

use crate::cache::SqlCache;
use crate::session::Session;
use crate::transport::{RpcTransport, params};

/// Rows of a result table included when asking the service about it.
pub const PREVIEW_ROWS: usize = 10;

/// Outcome of SQL generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Generated {
    Sql(String),
    /// The service found no SQL; this is its explanation.
    Explanation(String),
}

/// Client for one user session against the service.
///
/// All state lives here: the [`Session`] (key and model), the [`SqlCache`]
/// and the warehouse connection used by [`VannaClient::ask`]. Every call
/// awaits its single request before returning.
pub struct VannaClient {
    transport: RpcTransport,
    session: Session,
    cache: SqlCache,
    runner: Option<Arc<dyn SqlRunner>>,
}

impl std::fmt::Debug for VannaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VannaClient")
            .field("transport", &self.transport)
            .field("session", &self.session)
            .field("cached_pairs", &self.cache.len())
            .field("runner", &self.runner.as_ref().map(|r| r.dialect()))
            .finish()
    }
}

impl VannaClient {
    pub fn new(transport: RpcTransport, session: Session) -> Self {
        Self {
            transport,
            session,
            cache: SqlCache::new(),
            runner: None,
        }
    }

    /// Build a client from loaded configuration. A configured model is taken
    /// as-is; use [`VannaClient::set_model`] to check access.
    pub fn from_config(config: &VannaConfig) -> Result<Self> {
        let transport = RpcTransport::from_config(config)?;
        let mut session = match &config.api_key {
            Some(key) => Session::with_api_key(key.clone()),
            None => Session::new(),
        };
        if let Some(model) = config.model_name()?
            && !model.is_placeholder()
        {
            session.set_model(model);
        }
        Ok(Self::new(transport, session))
    }

    pub fn transport(&self) -> &RpcTransport {
        &self.transport
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &SqlCache {
        &self.cache
    }

    /// Connect a warehouse. SQL produced by [`VannaClient::ask`] runs there.
    pub fn connect(&mut self, runner: Arc<dyn SqlRunner>) {
        info!(dialect = runner.dialect(), "Warehouse connected");
        self.runner = Some(runner);
    }

    pub fn runner(&self) -> Option<&Arc<dyn SqlRunner>> {
        self.runner.as_ref()
    }

    /// Run SQL on the connected warehouse.
    pub async fn run_sql(&self, sql: &str) -> Result<DataFrame> {
        match &self.runner {
            Some(runner) => runner.run_sql(sql).await,
            None => Err(VannaError::improperly_configured(
                "Please connect to a database before running SQL.",
            )),
        }
    }

    pub fn api_key(&self) -> Option<&secrecy::SecretString> {
        self.session.api_key()
    }

    /// Switch to another key. Cached SQL belongs to the previous user and is
    /// dropped when the key changes.
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        if self.session.set_api_key(key) {
            info!("API key changed, clearing SQL cache");
            self.cache.clear();
        }
    }

    pub fn model(&self) -> Option<&ModelName> {
        self.session.model()
    }

    /// Select the model used by every scoped call.
    ///
    /// The placeholder `my-model` falls back to `VANNA_MODEL`. The name must
    /// be one of [`VannaClient::get_models`].
    pub async fn set_model(&mut self, name: &str) -> Result<()> {
        let mut model = ModelName::parse(name)?;
        if model.is_placeholder() {
            model = match std::env::var(MODEL_ENV_VAR).ok().filter(|v| !v.is_empty()) {
                Some(env_model) => ModelName::parse(&env_model)?,
                None => {
                    return Err(VannaError::validation(
                        "Please replace my-model with the name of your model.",
                    ));
                }
            };
        }

        let models = self.get_models().await?;
        if !models.iter().any(|m| m == model.as_str()) {
            return Err(VannaError::validation(format!(
                "You do not have access to model {model}. Use get_models() to see the models you can use."
            )));
        }

        info!(model = %model, "Model selected");
        self.session.set_model(model);
        Ok(())
    }

    /// [`VannaClient::set_model`] for a dynamically typed value, such as the
    /// `model` entry of `config.toml`.
    pub async fn set_model_value(&mut self, value: &toml::Value) -> Result<()> {
        let model = ModelName::from_toml(value)?;
        self.set_model(model.as_str()).await
    }

    /// Names of the models visible to the current user.
    pub async fn get_models(&self) -> Result<Vec<String>> {
        let orgs: OrgList = self.required(Method::ListOrgs, vec![]).await?;
        Ok(orgs.organizations)
    }

    /// Create a model. The name is slugified first, so `"Test @Org_"` creates
    /// `test-org`.
    pub async fn create_model(&self, model: &str, db_type: impl Into<DbType>) -> Result<bool> {
        let org_name = slugify(model);
        if org_name.is_empty() {
            return Err(VannaError::validation(format!(
                "Model name {model:?} has no usable characters."
            )));
        }
        let param = NewOrganization {
            org_name,
            db_type: db_type.into(),
        };
        self.status(Method::CreateOrg, params(&param)?).await
    }

    pub async fn add_user_to_model(&self, model: &str, email: &str, is_admin: bool) -> Result<bool> {
        let param = NewOrganizationMember {
            org_name: ModelName::parse(model)?.to_string(),
            email: non_blank(email, "email")?,
            is_admin,
        };
        self.status(Method::AddUserToOrg, params(&param)?).await
    }

    /// Make the current model public or private. Only admins succeed.
    pub async fn update_model_visibility(&self, public: bool) -> Result<bool> {
        self.status(
            Method::UpdateOrgVisibility,
            params(&Visibility { visibility: public })?,
        )
        .await
    }

    /// Store a question/SQL pair. An identical pair already trained through
    /// this client is not sent again.
    pub async fn add_sql(&mut self, question: &str, sql: &str, tag: QuestionCategory) -> Result<bool> {
        let question = non_blank(question, "question")?;
        let sql = non_blank(sql, "sql")?;
        let model = self.session.require_model()?.clone();

        if self.cache.contains_pair(&model, &question, &sql) {
            debug!(model = %model, "Pair already trained, skipping store");
            return Ok(true);
        }

        let pair = QuestionSqlPair {
            question,
            sql,
            tag,
        };
        let stored = self.status(Method::StoreSql, params(&pair)?).await?;
        if stored {
            self.cache.insert(&model, pair.question, pair.sql);
        }
        Ok(stored)
    }

    pub async fn add_ddl(&self, ddl: &str) -> Result<bool> {
        let data = StringData::new(non_blank(ddl, "ddl")?);
        self.status(Method::StoreDdl, params(&data)?).await
    }

    pub async fn add_documentation(&self, documentation: &str) -> Result<bool> {
        let data = StringData::new(non_blank(documentation, "documentation")?);
        self.status(Method::StoreDocumentation, params(&data)?).await
    }

    /// Remove a question/SQL pair by its question.
    pub async fn remove_sql(&mut self, question: &str) -> Result<bool> {
        let model = self.session.require_model()?.clone();
        let removed = self
            .status(Method::RemoveSql, params(&Question::new(question))?)
            .await?;
        if removed {
            self.cache.remove(&model, question);
        }
        Ok(removed)
    }

    /// Remove one training record by id.
    pub async fn remove_training_data(&mut self, id: &str) -> Result<bool> {
        let model = self.session.require_model()?.clone();
        let data = StringData::new(non_blank(id, "id")?);
        let removed = self.status(Method::RemoveTrainingData, params(&data)?).await?;
        if removed {
            // Ids are opaque, so the removed record cannot be matched to a
            // cached question.
            self.cache.clear_model(&model);
        }
        Ok(removed)
    }

    pub async fn flag_sql_for_review(
        &self,
        question: &str,
        sql: Option<&str>,
        error_msg: Option<&str>,
    ) -> Result<bool> {
        let flag = FlagForReview {
            question: non_blank(question, "question")?,
            sql: sql.map(str::to_string),
            error_msg: error_msg.map(str::to_string),
        };
        self.status(Method::FlagSqlForReview, params(&flag)?).await
    }

    /// All training records of the current model: `id`,
    /// `training_data_type`, `question`, `content`.
    pub async fn get_training_data(&self) -> Result<DataFrame> {
        self.table(Method::GetTrainingData).await
    }

    /// Question history of the current model.
    pub async fn get_all_questions(&self) -> Result<DataFrame> {
        self.table(Method::GetAllQuestions).await
    }

    pub async fn get_related_training_data(&self, question: &str) -> Result<TrainingData> {
        self.required(
            Method::GetRelatedTrainingData,
            params(&Question::new(question))?,
        )
        .await
    }

    pub async fn get_accuracy_stats(&self) -> Result<AccuracyStats> {
        self.required(Method::GetAccuracyStats, vec![]).await
    }

    /// SQL for a question. A question trained through this client for the
    /// current model is answered from the cache.
    ///
    /// When the service cannot derive SQL, the returned string is its
    /// explanation instead.
    pub async fn generate_sql(&self, question: &str) -> Result<String> {
        Ok(match self.generate(question).await? {
            Generated::Sql(sql) | Generated::Explanation(sql) => sql,
        })
    }

    /// [`VannaClient::generate_sql`], keeping whether SQL was produced.
    pub(crate) async fn generate(&self, question: &str) -> Result<Generated> {
        let question = non_blank(question, "question")?;
        let model = self.session.require_model()?;
        if let Some(sql) = self.cache.get(model, &question) {
            debug!(model = %model, "SQL cache hit");
            return Ok(Generated::Sql(sql.to_string()));
        }

        let answer: SqlAnswer = self
            .required(
                Method::GenerateSqlFromQuestion,
                params(&Question::new(question))?,
            )
            .await?;
        if answer.sql.is_empty() {
            Ok(Generated::Explanation(answer.raw_answer))
        } else {
            Ok(Generated::Sql(answer.sql))
        }
    }

    /// Answer questions about the model itself, such as which tables exist.
    pub async fn generate_meta(&self, question: &str) -> Result<String> {
        let explanation: Explanation = self
            .required(
                Method::GenerateMetaFromQuestion,
                params(&Question::new(non_blank(question, "question")?))?,
            )
            .await?;
        Ok(explanation.explanation)
    }

    pub async fn generate_explanation(&self, sql: &str) -> Result<String> {
        let explanation: Explanation = self
            .required(
                Method::GenerateExplanation,
                params(&SqlAnswer::for_sql(non_blank(sql, "sql")?))?,
            )
            .await?;
        Ok(explanation.explanation)
    }

    /// The question a SQL statement answers.
    pub async fn generate_question(&self, sql: &str) -> Result<String> {
        let question: Question = self
            .required(
                Method::GenerateQuestion,
                params(&SqlAnswer::for_sql(non_blank(sql, "sql")?))?,
            )
            .await?;
        Ok(question.question)
    }

    /// Suggested questions for the current model.
    pub async fn generate_questions(&self) -> Result<Vec<String>> {
        let list: QuestionStringList = self.required(Method::GenerateQuestions, vec![]).await?;
        Ok(list.questions)
    }

    pub async fn generate_followup_questions(
        &self,
        question: &str,
        df: &DataFrame,
    ) -> Result<Vec<String>> {
        let data = DataResult {
            question: question.to_string(),
            sql: String::new(),
            table_markdown: df.head(PREVIEW_ROWS).to_markdown(),
            error: None,
            correction_attempts: 0,
        };
        let list: QuestionStringList = self
            .required(Method::GenerateFollowupQuestions, params(&data)?)
            .await?;
        Ok(list.questions)
    }

    /// Plotly code charting `df`, the result of `sql` for `question`.
    pub async fn generate_plotly_code(
        &self,
        question: &str,
        sql: &str,
        df: &DataFrame,
    ) -> Result<String> {
        let data = DataResult {
            question: question.to_string(),
            sql: sql.to_string(),
            table_markdown: df.head(PREVIEW_ROWS).to_markdown(),
            error: None,
            correction_attempts: 0,
        };
        let plotly: PlotlyResult = self
            .required(Method::GeneratePlotlyCode, params(&data)?)
            .await?;
        Ok(plotly.plotly_code)
    }

    /// Call a method whose result is required.
    pub(crate) async fn required<T: DeserializeOwned>(
        &self,
        method: Method,
        params: Vec<Value>,
    ) -> Result<T> {
        let response = self.transport.call::<T>(&self.session, method, params).await?;
        match response.result {
            Some(result) => Ok(result),
            None => Err(VannaError::Server(response.error_message())),
        }
    }

    /// Call a mutating method. A refusal is reported as `false`.
    async fn status(&self, method: Method, params: Vec<Value>) -> Result<bool> {
        let response = self
            .transport
            .call::<Status>(&self.session, method, params)
            .await?;
        match response.result {
            Some(status) => {
                if !status.success {
                    warn!(method = %method, message = %status.message, "Service refused request");
                }
                Ok(status.success)
            }
            None => {
                warn!(method = %method, error = %response.error_message(), "Service refused request");
                Ok(false)
            }
        }
    }

    async fn table(&self, method: Method) -> Result<DataFrame> {
        let json: DataFrameJson = self.required(method, vec![]).await?;
        Ok(DataFrame::from_pandas_json(&json.data)?)
    }
}

/// Owned copy of `value`, rejecting blank input. The text is kept verbatim
/// since cache lookups match questions exactly.
pub(crate) fn non_blank(value: &str, field: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(VannaError::validation(format!("Please provide a non-empty {field}.")));
    }
    Ok(value.to_string())
}
