//! Warehouse connectors.
//!
//! [`SqlRunner`] is the seam the client executes SQL through. Postgres has a
//! pooled runner; BigQuery only has settings validation, and callers plug in
//! their own runner for it (and for anything else).

pub mod bigquery;
pub mod postgres;

use async_trait::async_trait;

use vanna_common::Result;
use vanna_protocol::DataFrame;

pub use bigquery::{BigQuerySettings, PROJECT_ID_ENV_VAR};
pub use postgres::{PostgresOptions, PostgresRunner, PostgresSettings};

/// Executes SQL against a warehouse and returns the rows.
#[async_trait]
pub trait SqlRunner: Send + Sync {
    /// Short name of the SQL dialect, for logs.
    fn dialect(&self) -> &'static str;

    async fn run_sql(&self, sql: &str) -> Result<DataFrame>;
}
