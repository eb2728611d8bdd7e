//! Reading the emailed one-time code.

use std::io::{BufRead, Write};

use async_trait::async_trait;

use vanna_common::{Result, VannaError};

use crate::constants::CODE_PROMPT;

/// Source of the one-time code sent to `email`.
#[async_trait]
pub trait CodePrompt: Send + Sync {
    async fn read_code(&self, email: &str) -> Result<String>;
}

/// Asks on stderr and reads one line from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

#[async_trait]
impl CodePrompt for StdinPrompt {
    async fn read_code(&self, _email: &str) -> Result<String> {
        tokio::task::spawn_blocking(|| -> Result<String> {
            let mut stderr = std::io::stderr();
            write!(stderr, "{CODE_PROMPT}")?;
            stderr.flush()?;

            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            Ok(line.trim().to_string())
        })
        .await
        .map_err(|e| VannaError::Otp(format!("Reading the code was interrupted: {e}")))?
    }
}

/// A code known up front, for non-interactive use.
#[derive(Debug, Clone)]
pub struct FixedCode(pub String);

#[async_trait]
impl CodePrompt for FixedCode {
    async fn read_code(&self, _email: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}
