//! Postgres settings and a pooled runner.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::debug;

use vanna_common::{Result, VannaError};
use vanna_protocol::DataFrame;

use crate::SqlRunner;

pub const HOST_ENV_VAR: &str = "HOST";
pub const DATABASE_ENV_VAR: &str = "DATABASE";
pub const USER_ENV_VAR: &str = "PG_USER";
pub const PASSWORD_ENV_VAR: &str = "PASSWORD";
pub const PORT_ENV_VAR: &str = "PORT";

const MAX_CONNECTIONS: u32 = 5;

/// Connection fields as given by the caller; gaps are filled from the
/// environment.
#[derive(Debug, Clone, Default)]
pub struct PostgresOptions {
    pub host: Option<String>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
}

/// Complete Postgres connection settings.
pub struct PostgresSettings {
    pub host: String,
    pub database: String,
    pub user: String,
    password: SecretString,
    pub port: u16,
}

impl std::fmt::Debug for PostgresSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSettings")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("port", &self.port)
            .finish()
    }
}

fn missing(field: &str) -> VannaError {
    VannaError::improperly_configured(format!("Please set your postgres {field}"))
}

impl PostgresSettings {
    /// Resolve settings from `options` and the process environment.
    pub fn resolve(options: PostgresOptions) -> Result<Self> {
        Self::resolve_with(options, |key| std::env::var(key).ok())
    }

    /// Resolve settings, reading the environment through `lookup`.
    ///
    /// Fields are checked in the order host, database, user, password, port;
    /// the first missing one is named in the error.
    pub fn resolve_with(
        options: PostgresOptions,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let pick = |given: Option<String>, env: &str| {
            given
                .or_else(|| lookup(env))
                .filter(|value| !value.trim().is_empty())
        };

        let host = pick(options.host, HOST_ENV_VAR).ok_or_else(|| missing("host"))?;
        let database = pick(options.dbname, DATABASE_ENV_VAR).ok_or_else(|| missing("database"))?;
        let user = pick(options.user, USER_ENV_VAR).ok_or_else(|| missing("user"))?;
        let password = pick(options.password, PASSWORD_ENV_VAR).ok_or_else(|| missing("password"))?;
        let port = match options.port {
            Some(port) => port,
            None => {
                let raw = lookup(PORT_ENV_VAR)
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| missing("port"))?;
                raw.trim().parse().map_err(|_| {
                    VannaError::improperly_configured(format!("Invalid postgres port: {raw}"))
                })?
            }
        };

        Ok(Self {
            host,
            database,
            user,
            password: SecretString::from(password),
            port,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(self.password.expose_secret())
    }
}

/// Runs SQL on a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PostgresRunner {
    pool: PgPool,
}

impl PostgresRunner {
    /// Connect eagerly, failing if the database is unreachable.
    pub async fn connect(settings: &PostgresSettings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(settings.connect_options())
            .await
            .map_err(|e| {
                VannaError::improperly_configured(format!("Cannot connect to postgres: {e}"))
            })?;
        debug!(host = %settings.host, database = %settings.database, "Connected to postgres");
        Ok(Self { pool })
    }

    /// Build the pool without connecting; the first query opens a connection.
    pub fn connect_lazy(settings: &PostgresSettings) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_lazy_with(settings.connect_options());
        Self { pool }
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Wrap a query so every row comes back as one JSON object, which keeps
/// column order and sidesteps per-type decoding.
///
/// The query sits on its own lines so a trailing line comment cannot
/// swallow the closing parenthesis.
pub fn row_json_query(sql: &str) -> String {
    let sql = sql.trim().trim_end_matches(';').trim_end();
    format!("SELECT row_to_json(t)::text FROM (\n{sql}\n) t")
}

#[async_trait]
impl SqlRunner for PostgresRunner {
    fn dialect(&self) -> &'static str {
        "postgres"
    }

    async fn run_sql(&self, sql: &str) -> Result<DataFrame> {
        let query = row_json_query(sql);
        let rows: Vec<String> = sqlx::query_scalar(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| VannaError::Execution(e.to_string()))?;

        let mut records: Vec<serde_json::Map<String, serde_json::Value>> =
            Vec::with_capacity(rows.len());
        for row in rows {
            records.push(serde_json::from_str(&row)?);
        }
        debug!(rows = records.len(), "Postgres query finished");
        Ok(DataFrame::from_records(records))
    }
}
