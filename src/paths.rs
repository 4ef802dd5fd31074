//! Data-directory resolution.
//!
//! Hosts normally pass their data directory in directly. For hosts without
//! one, this resolves the conventional location: an environment override,
//! then the platform data directory, then a dot-directory under home.

use std::path::{Path, PathBuf};

/// Environment variable overriding the resolved data directory.
pub const DATA_DIR_ENV: &str = "CONFIG_STEWARD_DATA_DIR";

/// Resolve the directory the managed documents live in.
///
/// Precedence: `explicit` → [`DATA_DIR_ENV`] → platform data directory →
/// `~/.<app_name>` → `./<app_name>`.
pub fn resolve_data_dir(explicit: Option<&Path>, app_name: &str) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|d| d.join(app_name))
        .or_else(|| dirs::home_dir().map(|h| h.join(format!(".{app_name}"))))
        .unwrap_or_else(|| PathBuf::from(app_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let dir = resolve_data_dir(Some(Path::new("/srv/app")), "app");
        assert_eq!(dir, PathBuf::from("/srv/app"));
    }

    #[test]
    fn test_env_override_then_fallback() {
        // SAFETY: no other test in this crate touches this variable.
        unsafe { std::env::set_var(DATA_DIR_ENV, "/opt/app-data") };
        let dir = resolve_data_dir(None, "app");
        unsafe { std::env::remove_var(DATA_DIR_ENV) };
        assert_eq!(dir, PathBuf::from("/opt/app-data"));

        let dir = resolve_data_dir(None, "steward-app");
        assert!(dir.to_string_lossy().contains("steward-app"));
    }
}
