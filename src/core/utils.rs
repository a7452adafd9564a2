use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;

use crate::core::errors::Result;

const DEFAULT_DIR_NAME: &str = ".converter_core";
const HOME_ENV: &str = "CONVERTER_CORE_HOME";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const DATA_DIR: &str = "data";

/// Resolves every on-disk location used by the application from a single base directory.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application base directory, defaulting to `~/.converter_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    pub fn data_dir_in(base: &Path) -> PathBuf {
        base.join(DATA_DIR)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Record keys double as file stems, so only a conservative character set is accepted.
pub fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_keys_reject_path_components() {
        assert!(is_safe_key("areaCircle"));
        assert!(is_safe_key("jane.doe_99"));
        assert!(!is_safe_key("../etc/passwd"));
        assert!(!is_safe_key(".hidden"));
        assert!(!is_safe_key("two words"));
        assert!(!is_safe_key(""));
    }

    #[test]
    fn data_and_config_live_under_base() {
        let base = PathBuf::from("/tmp/converter");
        assert_eq!(
            PathResolver::config_file_in(&base),
            base.join("config").join("config.json")
        );
        assert_eq!(PathResolver::data_dir_in(&base), base.join("data"));
    }
}
