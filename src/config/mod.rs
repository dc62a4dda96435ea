use serde::{Deserialize, Serialize};
use std::fs;

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stderr
  pub file: Option<String>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// Storage backend kind
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// Slots live in process memory and vanish on exit
  Memory,
  /// One file per slot under `StorageConfig::path`
  #[default]
  File,
}

/// Storage configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StorageConfig {
  #[serde(default)]
  pub backend: Backend,

  /// Directory for the file backend
  #[serde(default = "default_storage_path")]
  pub path: String,

  /// Byte cap for the memory backend
  #[serde(default)]
  pub quota_bytes: Option<usize>,
}

fn default_storage_path() -> String {
  "./data".to_string()
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      backend: Backend::default(),
      path: default_storage_path(),
      quota_bytes: None,
    }
  }
}

/// Userlist configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
  /// Storage configuration
  #[serde(default)]
  pub storage: StorageConfig,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
    let config_str = fs::read_to_string(path)
      .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;

    let config: Config = toml::from_str(&config_str)
      .map_err(|e| format!("Failed to parse config file '{}': {}", path, e))?;

    Ok(config)
  }
}
