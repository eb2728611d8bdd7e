//! Command handlers.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::debug;

use vanna_client::{AskOptions, AskOutcome, RpcTransport, TrainRequest, VannaClient};
use vanna_common::{VannaConfig, config_file, slugify};
use vanna_connectors::{PostgresOptions, PostgresRunner, PostgresSettings};
use vanna_login::{StdinPrompt, get_api_key, get_api_key_with_code, save_api_key};
use vanna_protocol::{AccuracyStats, DataFrame};

use super::args::{
    AskArgs, Cli, Commands, GlobalArgs, LoginArgs, ModelsCommand, PostgresArgs, QuestionArg,
    SqlArg, TableFormat, TrainArgs, TrainingCommand,
};
use crate::styled_output::{print_info, print_success, print_warning};

/// Load configuration and run the selected command.
pub async fn dispatch_command(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli.global, VannaConfig::load()?);
    run_command(&config, cli.command).await
}

/// Apply command-line overrides to the loaded configuration.
pub fn resolve_config(global: &GlobalArgs, mut config: VannaConfig) -> VannaConfig {
    if let Some(endpoint) = &global.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(key) = &global.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(model) = &global.model {
        config.model = Some(toml::Value::String(model.clone()));
    }
    config
}

pub async fn run_command(config: &VannaConfig, command: Commands) -> Result<()> {
    debug!(endpoint = %config.endpoint, "Running command");
    match command {
        Commands::Login(args) => handle_login(config, args).await,
        Commands::Models(args) => handle_models(config, args.action).await,
        Commands::Train(args) => handle_train(config, args).await,
        Commands::Training(args) => handle_training(config, args.action).await,
        Commands::Sql(QuestionArg { question }) => {
            let client = scoped_client(config).await?;
            println!("{}", client.generate_sql(&question).await?);
            Ok(())
        }
        Commands::Ask(args) => handle_ask(config, args).await,
        Commands::Explain(SqlArg { sql }) => {
            let client = scoped_client(config).await?;
            println!("{}", client.generate_explanation(&sql).await?);
            Ok(())
        }
        Commands::Question(SqlArg { sql }) => {
            let client = scoped_client(config).await?;
            println!("{}", client.generate_question(&sql).await?);
            Ok(())
        }
        Commands::Questions => {
            let client = scoped_client(config).await?;
            for question in client.generate_questions().await? {
                println!("{question}");
            }
            Ok(())
        }
        Commands::Meta(QuestionArg { question }) => {
            let client = scoped_client(config).await?;
            println!("{}", client.generate_meta(&question).await?);
            Ok(())
        }
        Commands::Stats => {
            let client = scoped_client(config).await?;
            print!("{}", render_stats(&client.get_accuracy_stats().await?));
            Ok(())
        }
    }
}

/// Client for model-agnostic calls.
fn client(config: &VannaConfig) -> Result<VannaClient> {
    Ok(VannaClient::from_config(config)?)
}

/// Client with the configured model selected and its access checked.
pub async fn scoped_client(config: &VannaConfig) -> Result<VannaClient> {
    let Some(model) = &config.model else {
        bail!("No model selected. Pass --model or set VANNA_MODEL.");
    };
    let mut client = client(config)?;
    client.set_model_value(model).await?;
    Ok(client)
}

async fn handle_login(config: &VannaConfig, args: LoginArgs) -> Result<()> {
    let transport = RpcTransport::from_config(config)?;
    let key = match &args.code {
        Some(code) => get_api_key_with_code(&transport, &args.email, code).await?,
        None => get_api_key(&transport, &args.email, &StdinPrompt).await?,
    };

    if args.save {
        let path = config_file().context("Cannot locate the Vanna home directory")?;
        save_api_key(&path, &key)?;
        print_success(&format!("API key saved to {}", path.display()));
    } else {
        println!("{}", key.expose_secret());
    }
    Ok(())
}

async fn handle_models(config: &VannaConfig, action: ModelsCommand) -> Result<()> {
    match action {
        ModelsCommand::List => {
            for model in client(config)?.get_models().await? {
                println!("{model}");
            }
        }
        ModelsCommand::Create { name, db_type } => {
            report(
                client(config)?.create_model(&name, db_type).await?,
                &format!("Model {} created", slugify(&name)),
                "The service refused to create the model",
            );
        }
        ModelsCommand::AddUser {
            model,
            email,
            admin,
        } => {
            report(
                client(config)?.add_user_to_model(&model, &email, admin).await?,
                &format!("{email} added to {model}"),
                "The service refused to add the user",
            );
        }
        ModelsCommand::Visibility { public, .. } => {
            let client = scoped_client(config).await?;
            let visibility = if public { "public" } else { "private" };
            report(
                client.update_model_visibility(public).await?,
                &format!("Model is now {visibility}"),
                "The service refused to change visibility",
            );
        }
    }
    Ok(())
}

impl From<TrainArgs> for TrainRequest {
    fn from(args: TrainArgs) -> Self {
        TrainRequest {
            question: args.question,
            sql: args.sql,
            documentation: args.documentation,
            ddl: args.ddl,
            sql_file: args.sql_file,
            json_file: args.json_file,
        }
    }
}

async fn handle_train(config: &VannaConfig, args: TrainArgs) -> Result<()> {
    let mut client = scoped_client(config).await?;
    report(
        client.train(args.into()).await?,
        "Training data stored",
        "Some training data was not stored",
    );
    Ok(())
}

async fn handle_training(config: &VannaConfig, action: TrainingCommand) -> Result<()> {
    let mut client = scoped_client(config).await?;
    match action {
        TrainingCommand::List { format } => {
            let df = client.get_training_data().await?;
            if df.is_empty() {
                print_info("No training data");
            } else {
                print!("{}", render_table(&df, format)?);
            }
        }
        TrainingCommand::Remove { id } => {
            report(
                client.remove_training_data(&id).await?,
                &format!("Removed {id}"),
                &format!("Couldn't remove {id}"),
            );
        }
        TrainingCommand::RemoveSql { question } => {
            report(
                client.remove_sql(&question).await?,
                "SQL removed",
                "Couldn't remove the SQL",
            );
        }
        TrainingCommand::Related { question } => {
            let related = client.get_related_training_data(&question).await?;
            println!("{}", serde_json::to_string_pretty(&related)?);
        }
        TrainingCommand::History { format } => {
            let df = client.get_all_questions().await?;
            if df.is_empty() {
                print_info("No questions asked yet");
            } else {
                print!("{}", render_table(&df, format)?);
            }
        }
        TrainingCommand::Flag {
            question,
            sql,
            error,
        } => {
            report(
                client
                    .flag_sql_for_review(&question, sql.as_deref(), error.as_deref())
                    .await?,
                "Flagged for review",
                "Couldn't flag the question",
            );
        }
    }
    Ok(())
}

async fn handle_ask(config: &VannaConfig, args: AskArgs) -> Result<()> {
    let mut client = scoped_client(config).await?;
    if args.postgres.postgres {
        let runner = connect_postgres(args.postgres).await?;
        client.connect(Arc::new(runner));
    }

    let options = AskOptions {
        print_results: !args.json,
        auto_train: !args.no_auto_train,
        generate_chart: !args.no_chart,
        generate_followups: !args.no_followups,
    };
    if let Some(outcome) = client.ask(&args.question, options).await? {
        println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
    }
    Ok(())
}

async fn connect_postgres(args: PostgresArgs) -> Result<PostgresRunner> {
    let settings = PostgresSettings::resolve(PostgresOptions {
        host: args.host,
        dbname: args.dbname,
        user: args.user,
        password: args.password,
        port: args.port,
    })?;
    Ok(PostgresRunner::connect(&settings).await?)
}

fn report(ok: bool, success: &str, refused: &str) {
    if ok {
        print_success(success);
    } else {
        print_warning(refused);
    }
}

/// `ask --json` output.
pub fn outcome_json(outcome: &AskOutcome) -> serde_json::Value {
    json!({
        "sql": outcome.sql,
        "data": outcome.df.as_ref().map(DataFrame::to_pandas_json),
        "plotly_code": outcome.chart.as_ref().map(|c| c.plotly_code.as_str()),
        "followup_questions": outcome.followup_questions,
    })
}

pub fn render_table(df: &DataFrame, format: TableFormat) -> Result<String> {
    Ok(match format {
        TableFormat::Markdown => df.to_markdown(),
        TableFormat::Csv => df.to_csv(),
        TableFormat::Json => format!("{}\n", serde_json::to_string_pretty(&df.to_pandas_json())?),
    })
}

pub fn render_stats(stats: &AccuracyStats) -> String {
    let mut out = format!("{} questions\n", stats.num_questions);
    for (category, count) in &stats.data {
        out.push_str(&format!("  {category}: {count}\n"));
    }
    out
}
