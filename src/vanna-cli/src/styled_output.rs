//! Status lines on stderr, colored when the terminal allows it.
//!
//! Colors follow the terminal background (via `COLORFGBG` or the iTerm
//! profile name) and are dropped when `NO_COLOR` is set or stderr is not a
//! terminal. Command results go to stdout uncolored so they can be piped.

use std::io::{IsTerminal, Write};

/// Check if colors should be disabled based on NO_COLOR env var.
fn colors_disabled() -> bool {
    std::env::var("NO_COLOR")
        .map(|v| !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(false)
}

struct Palette {
    success: &'static str,
    error: &'static str,
    warning: &'static str,
    info: &'static str,
}

const RESET: &str = "\x1b[0m";

const LIGHT: Palette = Palette {
    success: "\x1b[38;2;0;150;125m",
    error: "\x1b[38;2;217;61;61m",
    warning: "\x1b[38;2;201;154;46m",
    info: "\x1b[38;2;0;100;160m",
};

const DARK: Palette = Palette {
    success: "\x1b[38;2;0;245;212m",
    error: "\x1b[38;2;255;107;107m",
    warning: "\x1b[38;2;255;200;87m",
    info: "\x1b[38;2;72;202;228m",
};

/// Light background when `COLORFGBG` ends in 7 or more, or the iTerm
/// profile says so. Dark otherwise.
fn is_light_theme() -> bool {
    if let Ok(colorfgbg) = std::env::var("COLORFGBG")
        && let Some(bg) = colorfgbg.split(';').next_back()
        && let Ok(bg) = bg.parse::<u8>()
    {
        return bg >= 7;
    }

    std::env::var("ITERM_PROFILE")
        .map(|profile| profile.to_lowercase().contains("light"))
        .unwrap_or(false)
}

fn palette() -> &'static Palette {
    if is_light_theme() { &LIGHT } else { &DARK }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

impl MessageType {
    fn icon(&self) -> &'static str {
        match self {
            MessageType::Success => "[OK]",
            MessageType::Error => "[ERROR]",
            MessageType::Warning => "[WARN]",
            MessageType::Info => "[INFO]",
        }
    }

    fn color(&self) -> &'static str {
        let palette = palette();
        match self {
            MessageType::Success => palette.success,
            MessageType::Error => palette.error,
            MessageType::Warning => palette.warning,
            MessageType::Info => palette.info,
        }
    }
}

/// `message` prefixed with its icon, wrapped in color codes when `colored`.
pub fn format_message(msg_type: MessageType, message: &str, colored: bool) -> String {
    if colored {
        format!("{}{} {message}{RESET}", msg_type.color(), msg_type.icon())
    } else {
        format!("{} {message}", msg_type.icon())
    }
}

fn print_styled(msg_type: MessageType, message: &str) {
    let colored = !colors_disabled() && std::io::stderr().is_terminal();
    let line = format_message(msg_type, message, colored);
    let _ = writeln!(std::io::stderr(), "{line}");
}

pub fn print_success(message: &str) {
    print_styled(MessageType::Success, message);
}

pub fn print_error(message: &str) {
    print_styled(MessageType::Error, message);
}

pub fn print_warning(message: &str) {
    print_styled(MessageType::Warning, message);
}

pub fn print_info(message: &str) {
    print_styled(MessageType::Info, message);
}
