//! Argument parsing and command dispatch.

pub mod args;
pub mod handlers;
pub mod styles;

pub use args::{Cli, ColorMode, Commands, GlobalArgs, LogLevel, TableFormat};
pub use handlers::{dispatch_command, resolve_config, run_command};
pub use styles::get_styles;
