//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use super::styles::{AFTER_HELP, get_styles};

/// Log verbosity for the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse a level name, ignoring case. Accepts `warning` for `warn`.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Ask natural-language questions of your database through Vanna.
#[derive(Debug, Parser)]
#[command(
    name = "vanna",
    version,
    about = "Generate, run and train SQL from natural-language questions",
    styles = get_styles(),
    after_help = AFTER_HELP,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Log level for diagnostic output.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Shorthand for `--log-level debug`.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Shorthand for `--log-level trace`.
    #[arg(long, global = true)]
    pub trace: bool,

    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection overrides, applied on top of `config.toml` and the environment.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Service base URL.
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// API key to authenticate with.
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Model to work on.
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Get an API key by email one-time code.
    Login(LoginArgs),

    /// List, create and share models.
    Models(ModelsArgs),

    /// Add training data to the current model.
    Train(TrainArgs),

    /// Inspect or edit the current model's training data.
    Training(TrainingArgs),

    /// Generate SQL for a question.
    Sql(QuestionArg),

    /// Generate SQL, run it and suggest a chart and follow-up questions.
    Ask(AskArgs),

    /// Explain a SQL statement in plain language.
    Explain(SqlArg),

    /// Generate the question a SQL statement answers.
    Question(SqlArg),

    /// Suggest questions the current model can answer.
    Questions,

    /// Answer a question about the model's training data itself.
    Meta(QuestionArg),

    /// Question counts per category for the current model.
    Stats,
}

#[derive(Debug, Clone, Args)]
pub struct QuestionArg {
    pub question: String,
}

#[derive(Debug, Clone, Args)]
pub struct SqlArg {
    pub sql: String,
}

#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    /// Address the one-time code is sent to.
    #[arg(long)]
    pub email: String,

    /// Code already received; skips the prompt.
    #[arg(long)]
    pub code: Option<String>,

    /// Store the key in config.toml.
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub action: ModelsCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ModelsCommand {
    /// Models you can use.
    List,

    /// Create a model. The name is slugified.
    Create {
        name: String,

        /// Warehouse the model's SQL targets (Snowflake, BigQuery, Postgres, ...).
        #[arg(long, default_value = "Other")]
        db_type: String,
    },

    /// Give a user access to a model.
    AddUser {
        model: String,
        email: String,

        #[arg(long)]
        admin: bool,
    },

    /// Make the current model public or private.
    #[command(group(ArgGroup::new("visibility").required(true).args(["public", "private"])))]
    Visibility {
        #[arg(long)]
        public: bool,

        #[arg(long)]
        private: bool,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct TrainArgs {
    /// Question answered by `--sql`.
    #[arg(long)]
    pub question: Option<String>,

    /// SQL statement, or documentation text with `--documentation`.
    #[arg(long)]
    pub sql: Option<String>,

    /// Store `--sql` as documentation.
    #[arg(long)]
    pub documentation: bool,

    /// DDL statement.
    #[arg(long)]
    pub ddl: Option<String>,

    /// File of `;`-separated statements.
    #[arg(long, value_name = "PATH")]
    pub sql_file: Option<PathBuf>,

    /// JSON array of `{"question", "answer"}` objects.
    #[arg(long, value_name = "PATH")]
    pub json_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct TrainingArgs {
    #[command(subcommand)]
    pub action: TrainingCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TrainingCommand {
    /// All training records.
    List {
        #[arg(long, value_enum, default_value_t = TableFormat::Markdown)]
        format: TableFormat,
    },

    /// Remove a training record by id.
    Remove { id: String },

    /// Remove the SQL trained for a question.
    RemoveSql { question: String },

    /// Training data the service would use for a question.
    Related { question: String },

    /// Questions asked of the model so far.
    History {
        #[arg(long, value_enum, default_value_t = TableFormat::Markdown)]
        format: TableFormat,
    },

    /// Flag a question, with its SQL or error, for review.
    Flag {
        question: String,

        #[arg(long)]
        sql: Option<String>,

        #[arg(long)]
        error: Option<String>,
    },
}

/// How result tables are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    #[default]
    Markdown,
    Csv,
    Json,
}

/// Postgres connection fields; unset ones come from `HOST`, `DATABASE`,
/// `PG_USER`, `PASSWORD` and `PORT`.
#[derive(Debug, Clone, Default, Args)]
pub struct PostgresArgs {
    /// Run the SQL on Postgres.
    #[arg(long)]
    pub postgres: bool,

    #[arg(long, requires = "postgres")]
    pub host: Option<String>,

    #[arg(long, requires = "postgres")]
    pub dbname: Option<String>,

    #[arg(long, requires = "postgres")]
    pub user: Option<String>,

    #[arg(long, requires = "postgres")]
    pub password: Option<String>,

    #[arg(long, requires = "postgres")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Args)]
pub struct AskArgs {
    pub question: String,

    #[command(flatten)]
    pub postgres: PostgresArgs,

    #[arg(long)]
    pub no_chart: bool,

    #[arg(long)]
    pub no_followups: bool,

    /// Don't store the pair when the query returns rows.
    #[arg(long)]
    pub no_auto_train: bool,

    /// Print one JSON object instead of text.
    #[arg(long)]
    pub json: bool,
}
