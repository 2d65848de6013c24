//! Layered configuration loading

use std::path::PathBuf;

use config::{Config, Environment, File};

use crate::{
    error::Result,
    types::ClientConfig,
};

/// Configuration manager
///
/// Loads `ClientConfig` by layering a TOML file (optional) and
/// `BBSBOT_`-prefixed environment variables over the built-in defaults.
pub struct ConfigManager {
    config_path: PathBuf,
    env_prefix: String,
}

impl ConfigManager {
    /// Create a manager pointing at the default config path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: "BBSBOT".to_string(),
        }
    }

    /// Create a manager with a custom config path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: "BBSBOT".to_string(),
        }
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bbsbot")
            .join("config.toml")
    }

    /// Load configuration, validating the result
    pub fn load(&self) -> Result<ClientConfig> {
        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(Environment::with_prefix(&self.env_prefix).try_parsing(true));

        let config: ClientConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to the managed path
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let toml = toml::to_string_pretty(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.toml"));
        let config = manager.load().unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.toml"));

        let mut config = ClientConfig::default();
        config.charset = "big5".to_string();
        config.timeout_ms = 500;
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.charset, "big5");
        assert_eq!(loaded.timeout_ms, 500);
    }

    #[test]
    fn test_load_rejects_invalid_protocol() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "protocol = \"telnet\"\n").unwrap();

        let manager = ConfigManager::with_path(path);
        assert!(manager.load().is_err());
    }
}
