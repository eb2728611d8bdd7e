//! Question answering: generate SQL, run it, chart it, suggest follow-ups.

use tracing::{info, warn};

use vanna_common::Result;
use vanna_protocol::{DataFrame, QuestionCategory};

use crate::client::{Generated, VannaClient};

/// Steps [`VannaClient::ask`] performs after generating SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AskOptions {
    /// Print everything to stdout and return nothing.
    pub print_results: bool,
    /// Store the pair when the SQL ran and returned rows.
    pub auto_train: bool,
    pub generate_chart: bool,
    pub generate_followups: bool,
}

impl Default for AskOptions {
    fn default() -> Self {
        Self {
            print_results: true,
            auto_train: true,
            generate_chart: true,
            generate_followups: true,
        }
    }
}

impl AskOptions {
    /// Defaults, but return the outcome instead of printing it.
    pub fn quiet() -> Self {
        Self {
            print_results: false,
            ..Self::default()
        }
    }
}

/// Plotly code for a result table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    pub plotly_code: String,
}

/// Everything produced for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct AskOutcome {
    pub sql: String,
    /// Rows returned by the warehouse; `None` without a connected warehouse.
    pub df: Option<DataFrame>,
    pub chart: Option<Chart>,
    pub followup_questions: Vec<String>,
}

impl AskOutcome {
    fn print(&self) {
        println!("{}", self.sql);
        if let Some(df) = &self.df {
            println!("{df}");
        }
        if let Some(chart) = &self.chart {
            println!("{}", chart.plotly_code);
        }
        if !self.followup_questions.is_empty() {
            println!("AI-generated follow-up questions:");
            for question in &self.followup_questions {
                println!("{question}");
            }
        }
    }
}

impl VannaClient {
    /// Answer a question end to end.
    ///
    /// SQL generation and execution errors propagate. Chart and follow-up
    /// generation failures are logged and leave those parts empty, and so does
    /// a failed auto-train. Without a connected warehouse only the SQL is
    /// produced, and so is the service's explanation when it found no SQL.
    ///
    /// Returns `None` when `options.print_results` is set.
    pub async fn ask(&mut self, question: &str, options: AskOptions) -> Result<Option<AskOutcome>> {
        let (sql, has_sql) = match self.generate(question).await? {
            Generated::Sql(sql) => (sql, true),
            Generated::Explanation(text) => {
                info!("No SQL generated, skipping execution");
                (text, false)
            }
        };
        let mut outcome = AskOutcome {
            sql,
            df: None,
            chart: None,
            followup_questions: Vec::new(),
        };

        if has_sql && self.runner().is_some() {
            let df = self.run_sql(&outcome.sql).await?;
            info!(rows = df.len(), "Query ran");

            if options.auto_train
                && !df.is_empty()
                && let Err(e) = self
                    .add_sql(question, &outcome.sql, QuestionCategory::SqlRan)
                    .await
            {
                warn!(error = %e, "Could not store the question/SQL pair");
            }

            if options.generate_chart && !df.is_empty() {
                match self.generate_plotly_code(question, &outcome.sql, &df).await {
                    Ok(plotly_code) => outcome.chart = Some(Chart { plotly_code }),
                    Err(e) => warn!(error = %e, "Couldn't generate a chart"),
                }
            }

            if options.generate_followups {
                match self.generate_followup_questions(question, &df).await {
                    Ok(questions) => outcome.followup_questions = questions,
                    Err(e) => warn!(error = %e, "Couldn't generate follow-up questions"),
                }
            }

            outcome.df = Some(df);
        }

        if options.print_results {
            outcome.print();
            return Ok(None);
        }
        Ok(Some(outcome))
    }
}
