//! Constants for the vanna-login module.

/// Address used in documentation snippets; never a real account.
pub const PLACEHOLDER_EMAIL: &str = "my-email@example.com";

/// Shown when waiting for the emailed code.
pub const CODE_PROMPT: &str = "Check your email for the code and enter it here: ";
