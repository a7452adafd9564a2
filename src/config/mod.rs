use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::{
    errors::{ConverterError, Result},
    utils::{ensure_dir, PathResolver},
};

const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_LOG_FILTER: &str = "converter_core=info";

/// Persisted application preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Directory holding users, formulas and history. Defaults to `<base>/data`.
    pub data_root: Option<PathBuf>,
    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,
    #[serde(default = "Config::default_true")]
    pub seed_default_catalog: bool,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: None,
            log_filter: Self::default_log_filter(),
            seed_default_catalog: true,
            ui_color_enabled: true,
            last_active_user: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 4] = [
        "data_root",
        "log_filter",
        "seed_default_catalog",
        "ui_color_enabled",
    ];

    pub fn default_log_filter() -> String {
        DEFAULT_LOG_FILTER.into()
    }

    fn default_true() -> bool {
        true
    }

    pub fn resolve_data_root(&self, base: &Path) -> PathBuf {
        self.data_root
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(base))
    }

    /// Updates one preference from its textual form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_root" => {
                self.data_root = match value.trim() {
                    "" | "default" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            "log_filter" => {
                if value.trim().is_empty() {
                    return Err(ConverterError::ConfigError(
                        "log_filter cannot be empty".into(),
                    ));
                }
                self.log_filter = value.trim().to_string();
            }
            "seed_default_catalog" => self.seed_default_catalog = parse_flag(key, value)?,
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(key, value)?,
            other => {
                return Err(ConverterError::ConfigError(format!(
                    "unknown setting `{}` (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(ConverterError::ConfigError(format!(
            "`{other}` is not a valid value for {key} (use on/off)"
        ))),
    }
}

/// Handles persistence of [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        let path = PathResolver::config_file_in(&base);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { base, path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| {
                ConverterError::ConfigError(format!("{}: {}", self.path.display(), err))
            })
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        assert_eq!(manager.load().expect("load"), Config::default());
    }

    #[test]
    fn set_value_parses_flags_and_rejects_unknown_keys() {
        let mut config = Config::default();
        config.set_value("ui_color_enabled", "off").expect("flag");
        assert!(!config.ui_color_enabled);
        config.set_value("data_root", "/srv/converter").expect("path");
        assert_eq!(config.data_root, Some(PathBuf::from("/srv/converter")));
        config.set_value("data_root", "default").expect("reset");
        assert!(config.data_root.is_none());

        assert!(config.set_value("ui_color_enabled", "maybe").is_err());
        assert!(config.set_value("theme", "dark").is_err());
    }

    #[test]
    fn corrupt_file_is_a_configuration_error() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        fs::write(manager.path(), "{ not json").expect("write");
        assert!(matches!(manager.load(), Err(ConverterError::ConfigError(_))));
    }
}
