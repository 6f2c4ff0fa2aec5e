//! Path normalization shared by the dispatcher and the startup guard.

use once_cell::sync::Lazy;
use regex::Regex;

/// A run of two or more separators that does not follow a scheme colon.
static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^:])/{2,}").expect("separator pattern is valid"));

/// Any run of separators, scheme or not.
static ANY_SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/{2,}").expect("separator pattern is valid"));

/// Collapse separator runs into a single `/`, keeping `scheme://` intact.
///
/// Idempotent: `normalize_path(&normalize_path(p)) == normalize_path(p)`.
pub fn normalize_path(path: &str) -> String {
    SEPARATOR_RUN.replace_all(path, "${1}/").into_owned()
}

/// Collapse every separator run. Only valid on a bare path component.
pub fn collapse_all_separators(path: &str) -> String {
    ANY_SEPARATOR_RUN.replace_all(path, "/").into_owned()
}

/// Compose a mount prefix with an app-relative path.
pub fn join_prefixed(prefix: &str, path: &str) -> String {
    normalize_path(&format!("{prefix}{path}"))
}
