//! XDG Base Directory paths for extpolicy.
//!
//! Only the file-backed policy store and the user config file live here.
//! On Windows the policy store is the machine registry and these paths are
//! used for the config file alone.

use std::path::PathBuf;

const APP_DIR: &str = "extpolicy";

/// Get the extpolicy config directory.
///
/// Returns `$XDG_CONFIG_HOME/extpolicy` if set, otherwise `~/.config/extpolicy`.
///
/// # Examples
///
/// ```
/// use extpolicy_paths::config_dir;
///
/// let config_file = config_dir().join("config.toml");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join(APP_DIR)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config").join(APP_DIR)
    } else {
        PathBuf::from(".config").join(APP_DIR)
    }
}

/// Get the extpolicy data directory.
///
/// Returns `$XDG_DATA_HOME/extpolicy` if set, otherwise `~/.local/share/extpolicy`.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join(APP_DIR)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".local/share").join(APP_DIR)
    } else {
        PathBuf::from(".local/share").join(APP_DIR)
    }
}

/// Default root of the file-backed policy store.
pub fn store_dir() -> PathBuf {
    data_dir().join("store")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-mutating tests share one test body so they cannot race each other.
    #[test]
    fn test_dirs_respect_xdg_env() {
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/tmp/test-config");
            std::env::set_var("XDG_DATA_HOME", "/tmp/test-data");
        }
        assert_eq!(config_dir(), PathBuf::from("/tmp/test-config/extpolicy"));
        assert_eq!(data_dir(), PathBuf::from("/tmp/test-data/extpolicy"));
        assert_eq!(store_dir(), PathBuf::from("/tmp/test-data/extpolicy/store"));
        unsafe {
            std::env::remove_var("XDG_CONFIG_HOME");
            std::env::remove_var("XDG_DATA_HOME");
        }
    }

    #[test]
    fn test_store_dir_is_under_data_dir() {
        assert!(store_dir().ends_with("extpolicy/store"));
    }
}
