//! Environment variable helpers for `from_env` constructors.

use std::str::FromStr;

/// Read and parse an environment variable, falling back to `default` when
/// the variable is unset or does not parse.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
