//! Utility functions for the vanna-login module.

/// Mask an API key for safe display.
pub fn safe_format_key(key: &str) -> String {
    if key.len() <= 8 || !key.is_ascii() {
        return "***".to_string();
    }
    let prefix = &key[..4];
    let suffix = &key[key.len() - 4..];
    format!("{prefix}***{suffix}")
}
