use crate::error::{ModelariumError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub instances: InstancesConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FetchConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_revision")]
    pub revision: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct InstancesConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from("..")
}
fn default_revision() -> String {
    "main".to_string()
}
fn default_directory() -> PathBuf {
    PathBuf::from("../modelfiles")
}
fn default_pattern() -> String {
    r".*\.modelfile".to_string()
}
fn default_host() -> String {
    "http://localhost:11434".to_string()
}
fn default_namespace() -> String {
    "mgmacleod".to_string()
}
fn default_timeout_secs() -> u64 {
    300
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            revision: default_revision(),
        }
    }
}

impl Default for InstancesConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            pattern: default_pattern(),
            host: default_host(),
            namespace: default_namespace(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from the default location, or defaults if there is no file
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ModelariumError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;

        let config = toml::from_str(&content).map_err(|e| {
            ModelariumError::Config(format!("Failed to parse {}: {e}", path.display()))
        })?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Get config file path
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;

    Some(config_dir.join("modelarium").join("config.toml"))
}
