//! Environment variable parsing utilities

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when missing or invalid
///
/// # Example
/// ```ignore
/// let max: u32 = env_or("DB_MAX_CONNECTIONS", 5);
/// ```
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid value in environment, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Parse an environment variable, returning None if missing or invalid
pub fn env_opt<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
