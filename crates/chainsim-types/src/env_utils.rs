//! Environment variable helpers used by the harness configuration.
//!
//! Every tunable falls back to a default when its variable is unset or does
//! not parse, so a bare environment always yields a usable configuration:
//!
//! ```
//! use chainsim_types::env_utils::{env_var_or, env_string_or};
//!
//! let max_blocks: u64 = env_var_or("CHAINSIM_DOC_MAX_BLOCKS", 20);
//! let proxy = env_string_or("CHAINSIM_DOC_PROXY_URL", "http://localhost:8085");
//! assert_eq!(max_blocks, 20);
//! assert_eq!(proxy, "http://localhost:8085");
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Parse a variable into any `FromStr` type. `None` if unset or unparsable.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// True when the variable is `1`, `true`, `yes` or `on` (any case).
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// String value, or `default` when unset or empty.
pub fn env_string_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

pub fn env_path_or(key: &str, default: &str) -> PathBuf {
    PathBuf::from(env_string_or(key, default))
}

/// Duration given in milliseconds.
pub fn env_millis_or(key: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_var_or(key, default_ms))
}

/// Duration given in whole seconds.
pub fn env_secs_or(key: &str, default_secs: u64) -> Duration {
    Duration::from_secs(env_var_or(key, default_secs))
}
