//! Training input validation and dispatch.
//!
//! [`TrainRequest`] is the loose, flag-style form callers (and the CLI) build.
//! It is converted into a [`TrainingInput`] with exactly one source, then
//! expanded into [`TrainingItem`]s. Files are read and parsed during
//! expansion, so every input problem surfaces before the first network call.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};
use tracing::{debug, info};

use vanna_common::{Result, VannaError, validate_config_path};
use vanna_protocol::QuestionCategory;

use crate::client::{VannaClient, non_blank};

/// Loose training request, one field per possible source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainRequest {
    pub question: Option<String>,
    pub sql: Option<String>,
    /// Treat `sql` as a documentation snippet.
    pub documentation: bool,
    pub ddl: Option<String>,
    pub sql_file: Option<PathBuf>,
    pub json_file: Option<PathBuf>,
}

impl TrainRequest {
    /// A SQL statement whose question is generated by the service.
    pub fn sql(sql: impl Into<String>) -> Self {
        Self {
            sql: Some(sql.into()),
            ..Self::default()
        }
    }

    pub fn pair(question: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            sql: Some(sql.into()),
            ..Self::default()
        }
    }

    pub fn documentation(text: impl Into<String>) -> Self {
        Self {
            sql: Some(text.into()),
            documentation: true,
            ..Self::default()
        }
    }

    pub fn ddl(ddl: impl Into<String>) -> Self {
        Self {
            ddl: Some(ddl.into()),
            ..Self::default()
        }
    }

    pub fn sql_file(path: impl Into<PathBuf>) -> Self {
        Self {
            sql_file: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            json_file: Some(path.into()),
            ..Self::default()
        }
    }
}

/// A validated training request with exactly one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingInput {
    /// Question/SQL pair; the question is generated when absent.
    Pair {
        question: Option<String>,
        sql: String,
    },
    Documentation(String),
    Ddl(String),
    /// `.sql` file of `;`-separated statements.
    SqlFile(PathBuf),
    /// `.json` file holding an array of `{question, answer}` objects.
    JsonFile(PathBuf),
}

const SOURCES: &str = "sql, documentation, ddl, sql_file or json_file";

impl TryFrom<TrainRequest> for TrainingInput {
    type Error = VannaError;

    fn try_from(request: TrainRequest) -> Result<Self> {
        let TrainRequest {
            question,
            sql,
            documentation,
            ddl,
            sql_file,
            json_file,
        } = request;

        if documentation && sql.is_none() {
            return Err(VannaError::validation(
                "Please provide the documentation text when training documentation.",
            ));
        }
        if question.is_some() && sql.is_none() {
            return Err(VannaError::validation(
                "Please also provide a SQL query for the question.",
            ));
        }
        if documentation && question.is_some() {
            return Err(VannaError::validation(
                "A question cannot be attached to documentation.",
            ));
        }

        let given = [
            sql.is_some(),
            ddl.is_some(),
            sql_file.is_some(),
            json_file.is_some(),
        ]
        .into_iter()
        .filter(|given| *given)
        .count();
        if given == 0 {
            return Err(VannaError::validation(format!(
                "Please provide one of {SOURCES}."
            )));
        }
        if given > 1 {
            return Err(VannaError::validation(format!(
                "Please provide only one of {SOURCES}."
            )));
        }

        if let Some(sql) = sql {
            let text = non_blank(&sql, if documentation { "documentation" } else { "sql" })?;
            if documentation {
                return Ok(TrainingInput::Documentation(text));
            }
            let question = question
                .map(|q| non_blank(&q, "question"))
                .transpose()?;
            return Ok(TrainingInput::Pair {
                question,
                sql: text,
            });
        }
        if let Some(ddl) = ddl {
            return Ok(TrainingInput::Ddl(non_blank(&ddl, "ddl")?));
        }
        if let Some(path) = sql_file {
            return Ok(TrainingInput::SqlFile(validate_config_path(path)?));
        }
        match json_file {
            Some(path) => Ok(TrainingInput::JsonFile(validate_config_path(path)?)),
            None => Err(VannaError::validation(format!(
                "Please provide one of {SOURCES}."
            ))),
        }
    }
}

/// One record to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingItem {
    Pair {
        question: Option<String>,
        sql: String,
    },
    Ddl(String),
    Documentation(String),
}

impl TrainingInput {
    /// Expand into the records to store, reading files as needed.
    pub fn into_items(self) -> Result<Vec<TrainingItem>> {
        match self {
            TrainingInput::Pair { question, sql } => Ok(vec![TrainingItem::Pair { question, sql }]),
            TrainingInput::Documentation(text) => Ok(vec![TrainingItem::Documentation(text)]),
            TrainingInput::Ddl(ddl) => Ok(vec![TrainingItem::Ddl(ddl)]),
            TrainingInput::SqlFile(path) => {
                let raw = read_training_file(&path)?;
                let items: Vec<TrainingItem> = split_statements(&raw)
                    .map_err(|e| {
                        VannaError::validation(format!("Cannot parse {}: {e}", path.display()))
                    })?
                    .into_iter()
                    .map(|statement| {
                        if statement.is_create {
                            TrainingItem::Ddl(statement.text)
                        } else {
                            TrainingItem::Pair {
                                question: None,
                                sql: statement.text,
                            }
                        }
                    })
                    .collect();
                if items.is_empty() {
                    return Err(VannaError::validation(format!(
                        "No SQL statements found in {}",
                        path.display()
                    )));
                }
                Ok(items)
            }
            TrainingInput::JsonFile(path) => Ok(read_question_file(&path)?
                .into_iter()
                .map(|entry| TrainingItem::Pair {
                    question: Some(entry.question),
                    sql: entry.sql,
                })
                .collect()),
        }
    }
}

/// Contents of a training file. Unreadable or non-UTF-8 files are
/// configuration problems.
fn read_training_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        VannaError::improperly_configured(format!("Cannot read {}: {e}", path.display()))
    })
}

/// A statement found in a SQL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub text: String,
    /// Starts with `CREATE`, so it belongs in the DDL corpus.
    pub is_create: bool,
}

/// Split a SQL script on top-level `;`. Semicolons inside strings, quoted
/// identifiers and comments do not split. Segments holding only whitespace
/// and comments are dropped, and comments before a statement are not part
/// of its text.
pub fn split_statements(
    script: &str,
) -> std::result::Result<Vec<SqlStatement>, sqlparser::tokenizer::TokenizerError> {
    let dialect = GenericDialect {};
    let tokens = Tokenizer::new(&dialect, script).tokenize()?;

    let mut statements = Vec::new();
    for segment in tokens.split(|token| *token == Token::SemiColon) {
        let Some(first) = segment
            .iter()
            .find(|token| !matches!(token, Token::Whitespace(_)))
        else {
            continue;
        };
        let is_create = matches!(first, Token::Word(word) if word.keyword == Keyword::CREATE);
        let text: String = segment
            .iter()
            .skip_while(|token| matches!(token, Token::Whitespace(_)))
            .map(ToString::to_string)
            .collect();
        statements.push(SqlStatement {
            text: text.trim().to_string(),
            is_create,
        });
    }
    Ok(statements)
}

#[derive(Debug, Deserialize)]
struct QuestionFileEntry {
    question: String,
    #[serde(alias = "sql")]
    answer: String,
}

/// Question/SQL pair read from a JSON batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFilePair {
    pub question: String,
    pub sql: String,
}

/// Parse a JSON array of `{"question": ..., "answer": ...}` objects (`sql`
/// is accepted in place of `answer`).
pub fn read_question_file(path: &Path) -> Result<Vec<QuestionFilePair>> {
    let raw = read_training_file(path)?;
    let entries: Vec<QuestionFileEntry> = serde_json::from_str(&raw).map_err(|e| {
        VannaError::validation(format!(
            "{} must be a JSON array of objects with question and answer fields: {e}",
            path.display()
        ))
    })?;

    let mut pairs = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        if entry.question.trim().is_empty() || entry.answer.trim().is_empty() {
            return Err(VannaError::validation(format!(
                "Entry {i} of {} has an empty question or answer.",
                path.display()
            )));
        }
        pairs.push(QuestionFilePair {
            question: entry.question,
            sql: entry.answer,
        });
    }
    if pairs.is_empty() {
        return Err(VannaError::validation(format!(
            "No questions found in {}",
            path.display()
        )));
    }
    Ok(pairs)
}

impl VannaClient {
    /// Train the current model from one source.
    ///
    /// Returns `true` only when every record was stored. Re-training a pair
    /// this client already stored does not store it again.
    pub async fn train(&mut self, request: TrainRequest) -> Result<bool> {
        self.session().require_model()?;
        let items = TrainingInput::try_from(request)?.into_items()?;
        info!(count = items.len(), "Training");

        let mut all_stored = true;
        for item in items {
            let stored = match item {
                TrainingItem::Pair { question, sql } => {
                    let question = match question {
                        Some(question) => question,
                        None => {
                            let generated = self.generate_question(&sql).await?;
                            debug!(question = %generated, "Generated question for SQL");
                            generated
                        }
                    };
                    self.add_sql(&question, &sql, QuestionCategory::ManuallyTrained)
                        .await?
                }
                TrainingItem::Ddl(ddl) => self.add_ddl(&ddl).await?,
                TrainingItem::Documentation(text) => self.add_documentation(&text).await?,
            };
            all_stored &= stored;
        }
        Ok(all_stored)
    }
}
