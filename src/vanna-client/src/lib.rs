//! Vanna client - session handling, SQL caching and the model-scoped RPC
//! facade of the natural-language-to-SQL service.
//!
//! ```no_run
//! # async fn demo() -> vanna_common::Result<()> {
//! use vanna_client::{AskOptions, RpcTransport, Session, TrainRequest, VannaClient};
//!
//! let transport = RpcTransport::new("https://ask.vanna.ai")?;
//! let mut client = VannaClient::new(transport, Session::with_api_key("my-key"));
//! client.set_model("demo-tpc-h").await?;
//! client
//!     .train(TrainRequest::pair("How many customers?", "SELECT COUNT(*) FROM customer"))
//!     .await?;
//! let sql = client.generate_sql("How many customers?").await?;
//! let outcome = client.ask("How many customers?", AskOptions::quiet()).await?;
//! # let _ = (sql, outcome);
//! # Ok(())
//! # }
//! ```

pub mod ask;
pub mod cache;
pub mod client;
pub mod session;
pub mod training;
pub mod transport;

pub use ask::{AskOptions, AskOutcome, Chart};
pub use cache::SqlCache;
pub use client::{PREVIEW_ROWS, VannaClient};
pub use session::Session;
pub use training::{
    QuestionFilePair, SqlStatement, TrainRequest, TrainingInput, TrainingItem,
    read_question_file, split_statements,
};
pub use transport::{KEY_HEADER, MODEL_HEADER, RpcTransport, params};
