//! Login name lookup for the `keyname` default.

use std::env;

const FALLBACK_USER: &str = "handson";

/// Name of the logged-in user.
///
/// Checks `USER`, `LOGNAME` and `USERNAME` in that order and falls back to
/// `handson` when none is set to a non-empty value.
pub fn logged_user() -> String {
    ["USER", "LOGNAME", "USERNAME"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|name| !name.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_USER.to_string())
}
