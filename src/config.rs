use crate::constants::{DEFAULT_DATASET, EXPORT_FILE_NAME};
use crate::error::{Result, RosterError};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

fn default_dataset_path() -> String {
    DEFAULT_DATASET.to_string()
}

fn default_export_file_name() -> String {
    EXPORT_FILE_NAME.to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self { path: default_dataset_path() }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { file_name: default_export_file_name() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            RosterError::Config(format!("Failed to read config file '{}': {}", config_path, e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Load `config.toml` if present, otherwise fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
