//! Filesystem locations inside the Zellij plugin sandbox.
//!
//! The plugin sees the host home directory mounted at `/host` once
//! `FullHdAccess` is granted.

use std::path::PathBuf;

const HOST_ROOT: &str = "/host";

/// Directory holding the credential store and trace files.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(HOST_ROOT)
        .join(".local/share/zellij")
        .join("cafe-console")
}

/// File backing the persisted session token.
#[must_use]
pub fn credentials_file() -> PathBuf {
    get_data_dir().join("credentials.json")
}

/// Rewrites a leading `~` to the sandbox mount of the host home directory.
///
/// # Example
///
/// ```rust
/// use cafe_console::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("/etc/theme.toml"), "/etc/theme.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', HOST_ROOT, 1)
    } else if path == "~" {
        HOST_ROOT.to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("~"), "/host");
        assert_eq!(expand_tilde("~user/x"), "~user/x");
    }

    #[test]
    fn test_files_live_under_data_dir() {
        assert!(credentials_file().starts_with(get_data_dir()));
        assert!(get_data_dir().ends_with("cafe-console"));
    }
}
