//! Vanna Login - exchanging an email address for an API key.
//!
//! The service mails a one-time code to the address; the code is read through
//! a [`CodePrompt`] (stdin by default) and traded for the key. An API key in
//! `VANNA_API_KEY` short-circuits the whole flow.

pub mod constants;
pub mod otp;
pub mod prompt;
mod storage;
mod utils;

pub use constants::{CODE_PROMPT, PLACEHOLDER_EMAIL};
pub use otp::{get_api_key, get_api_key_with_code, get_api_key_with_env, send_code};
pub use prompt::{CodePrompt, FixedCode, StdinPrompt};
pub use storage::save_api_key;
pub use utils::safe_format_key;
