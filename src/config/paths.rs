use std::path::PathBuf;

use crate::error::{ClissoError, Result};

/// The current user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| ClissoError::InvalidConfig("Could not determine home directory".into()))
}

/// Expand a leading `~` to the user's home directory.
///
/// `~otheruser/...` is rejected rather than passed through as a relative path.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        return Err(ClissoError::InvalidConfig("empty path".into()));
    }
    if path == "~" {
        return home_dir();
    }
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        return Ok(home_dir()?.join(rest));
    }
    if path.starts_with('~') {
        return Err(ClissoError::InvalidConfig(format!(
            "cannot expand user-specific home dir in '{}'",
            path
        )));
    }
    Ok(PathBuf::from(path))
}
