use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterConfig {
    pub base_url: String,
}

impl Default for FrankfurterConfig {
    fn default() -> Self {
        FrankfurterConfig {
            base_url: "https://api.frankfurter.dev/v1".to_string(),
        }
    }
}

fn default_popular_base() -> String {
    "USD".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_from() -> String {
    "USD".to_string()
}

fn default_to() -> String {
    "EUR".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: FrankfurterConfig,
    /// Base currency of the popular rates panel
    #[serde(default = "default_popular_base")]
    pub popular_base: String,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_from")]
    pub default_from: String,
    #[serde(default = "default_to")]
    pub default_to: String,
    #[serde(default)]
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: FrankfurterConfig::default(),
            popular_base: default_popular_base(),
            refresh_interval_secs: default_refresh_interval_secs(),
            default_from: default_from(),
            default_to: default_to(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "xfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "codito", "xfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Directory of the durable key-value store.
    pub fn storage_path(&self) -> Result<PathBuf> {
        Ok(self.default_data_path()?.join("storage"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/frankfurter"
popular_base: "EUR"
refresh_interval_secs: 30
default_from: "GBP"
default_to: "JPY"
data_path: "/tmp/xfx"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/frankfurter");
        assert_eq!(config.popular_base, "EUR");
        assert_eq!(config.refresh_interval_secs, 30);
        assert_eq!(config.default_from, "GBP");
        assert_eq!(config.default_to, "JPY");
        assert_eq!(config.data_path.as_deref(), Some("/tmp/xfx"));
        assert_eq!(
            config.storage_path().unwrap(),
            PathBuf::from("/tmp/xfx").join("storage")
        );
    }

    #[test]
    fn test_config_defaults_for_missing_keys() {
        let config: AppConfig =
            serde_yaml::from_str("popular_base: \"CHF\"\n").expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "https://api.frankfurter.dev/v1");
        assert_eq!(config.popular_base, "CHF");
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.default_from, "USD");
        assert_eq!(config.default_to, "EUR");
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("nope.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
