//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::gateway::RemoteModel;

/// Artifex configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub gallery: GalleryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(skip)]
    pub api_key: Option<String>,
    pub augment_model: String,
    pub image_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GalleryConfig {
    /// Override for the persisted gallery location
    pub storage_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig {
                api_key: None,
                augment_model: RemoteModel::default_augmentation().id.to_string(),
                image_model: RemoteModel::default_image().id.to_string(),
                timeout_secs: 120,
            },
            gallery: GalleryConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Resolve the API key from the environment
    pub fn resolved_api_key(&self) -> anyhow::Result<Option<String>> {
        self.enforce_env_only()?;

        Ok(env::var("ARTIFEX_API_KEY")
            .or_else(|_| env::var("OPENROUTER_API_KEY"))
            .ok())
    }

    /// API key suitable for display
    pub fn redacted_api_key(&self) -> anyhow::Result<Option<String>> {
        self.resolved_api_key().map(|opt| {
            opt.map(|key| {
                if key.len() <= 4 {
                    "***".to_string()
                } else {
                    let suffix = &key[key.len() - 4..];
                    format!("***{}", suffix)
                }
            })
        })
    }

    pub fn enforce_env_only(&self) -> anyhow::Result<()> {
        if self.api_key.is_some() {
            return Err(anyhow!(
                "API keys must be provided via environment variables, not stored in configuration"
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("ARTIFEX_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("artifex")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            // Return default config without creating file
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.gateway.augment_model.trim().is_empty() {
            return Err(anyhow!("gateway.augment_model must not be empty"));
        }
        if self.gateway.image_model.trim().is_empty() {
            return Err(anyhow!("gateway.image_model must not be empty"));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(anyhow!("gateway.timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// Path of the persisted gallery document
    pub fn gallery_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.gallery.storage_path {
            return Ok(path.clone());
        }
        Ok(Self::config_dir()?.join("gallery.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.timeout_secs, 120);
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = Config::default();
        config.gateway.image_model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.gateway.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_must_come_from_environment() {
        let mut config = Config::default();
        config.gateway.api_key = Some("sk-inline".to_string());
        assert!(config.gateway.enforce_env_only().is_err());
        assert!(config.gateway.resolved_api_key().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.gateway.timeout_secs = 30;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.gateway.timeout_secs, 30);
        assert_eq!(loaded.gateway.image_model, config.gateway.image_model);
    }

    #[test]
    fn test_load_missing_file_yields_default() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded.gateway.timeout_secs, 120);
    }

    #[test]
    fn test_api_key_is_never_serialized() {
        let mut config = Config::default();
        config.gateway.api_key = Some("sk-secret".to_string());

        let contents = toml::to_string_pretty(&config).unwrap();
        assert!(!contents.contains("sk-secret"));
    }
}
