//! Path helpers that read the process environment

/// Expand environment variables and `~` in a path string.
///
/// Uses shellexpand; an unknown variable leaves the input untouched.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
