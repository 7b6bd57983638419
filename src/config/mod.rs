//! Configuration management for koun-edge

pub mod schema;

pub use schema::Config;

use crate::error::{EdgeError, EdgeResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("koun-edge")
            .join("config.toml")
    }

    /// Get the state directory path
    ///
    /// `KOUN_EDGE_STATE_DIR` overrides the platform default; integration
    /// tests point it at a temp dir.
    pub fn state_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("KOUN_EDGE_STATE_DIR") {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("koun-edge")
    }

    /// Get the cache partitions root
    pub fn cache_root() -> PathBuf {
        Self::state_dir().join("cache")
    }

    /// Get the worker event log path
    pub fn event_log_path() -> PathBuf {
        Self::state_dir().join("events.log")
    }

    /// Load configuration, creating default if not exists
    pub async fn load(&self) -> EdgeResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> EdgeResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| EdgeError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| EdgeError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> EdgeResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            EdgeError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> EdgeResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| EdgeError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Ensure all state directories exist
    pub async fn ensure_state_dirs() -> EdgeResult<()> {
        let dirs = [Self::state_dir(), Self::cache_root()];

        for dir in &dirs {
            fs::create_dir_all(dir).await.map_err(|e| {
                EdgeError::io(format!("creating directory {}", dir.display()), e)
            })?;
        }

        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
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
    use serial_test::serial;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.worker.partition, "koun-shell-v4");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.worker.partition = "koun-shell-v9".to_string();

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.worker.partition, "koun-shell-v9");
    }

    #[tokio::test]
    async fn invalid_toml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "worker = nonsense").await.unwrap();
        let manager = ConfigManager::with_path(path);

        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, EdgeError::ConfigInvalid { .. }));
    }

    #[test]
    #[serial]
    fn state_dir_honors_env_override() {
        std::env::set_var("KOUN_EDGE_STATE_DIR", "/tmp/koun-edge-test-state");
        assert_eq!(
            ConfigManager::state_dir(),
            PathBuf::from("/tmp/koun-edge-test-state")
        );
        assert_eq!(
            ConfigManager::cache_root(),
            PathBuf::from("/tmp/koun-edge-test-state/cache")
        );
        std::env::remove_var("KOUN_EDGE_STATE_DIR");
    }
}
