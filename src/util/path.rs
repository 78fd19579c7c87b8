use std::path::{Path, PathBuf};

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Falls back to the input unchanged when a variable is undefined.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Expand a path and anchor it at `base` when it is still relative.
pub fn resolve_against(path: &Path, base: &Path) -> PathBuf {
    let expanded = PathBuf::from(expand_env_vars(&path.to_string_lossy()));
    if expanded.is_relative() {
        base.join(expanded)
    } else {
        expanded
    }
}
