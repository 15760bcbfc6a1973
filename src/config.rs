use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;
use crate::walker::JournalJob;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
    /// Tags added to every converted note, after the journal's own tags
    #[serde(default = "default_tags")]
    pub default_tags: Vec<String>,
    #[serde(default)]
    pub journals: Vec<JournalConfig>,
}

/// One Day One journal export and where its notes should go
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    pub name: String,
    /// Export root holding photos/, videos/ and audios/
    pub import_dir: String,
    /// Defaults to `<import_dir>/<name>.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_file: Option<String>,
    /// Defaults to `<import_dir>/<name>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: Some(CURRENT_CONFIG_VERSION),
            default_tags: default_tags(),
            journals: Vec::new(),
        }
    }
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

fn default_tags() -> Vec<String> {
    vec!["#dayoneimport".to_string()]
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl JournalConfig {
    pub fn import_path(&self) -> PathBuf {
        utils::expand_path(&self.import_dir)
    }

    pub fn journal_path(&self) -> PathBuf {
        match &self.journal_file {
            Some(file) => utils::expand_path(file),
            None => self.import_path().join(format!("{}.json", self.name)),
        }
    }

    pub fn export_path(&self) -> PathBuf {
        match &self.export_dir {
            Some(dir) => utils::expand_path(dir),
            None => self.import_path().join(&self.name),
        }
    }

    /// Journal tags first, then the global defaults
    pub fn base_tags(&self, default_tags: &[String]) -> Vec<String> {
        self.tags.iter().chain(default_tags).cloned().collect()
    }

    pub fn to_job(&self, default_tags: &[String]) -> JournalJob {
        JournalJob {
            name: self.name.clone(),
            import_dir: self.import_path(),
            journal_file: self.journal_path(),
            export_dir: self.export_path(),
            base_tags: self.base_tags(default_tags),
        }
    }
}

impl Config {
    /// Load configuration from the default location, or create it if missing
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let mut config = Config::default();
            let save_result = config.save_to(&config_path);
            if let Err(ref e) = save_result {
                eprintln!("ERROR: Failed to save config file: {}", e);
                eprintln!("Config path: {:?}", config_path);
            }
            save_result?;
            Ok(config)
        }
    }

    /// Load configuration from an explicit path; the file must exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the given path
    pub fn save_to(&mut self, path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir()
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for journal in &self.journals {
            if journal.name.trim().is_empty() {
                return Err(ConfigError::InvalidConfig("journal name must not be empty".to_string()));
            }
            if journal.import_dir.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(format!(
                    "journal '{}' has an empty import_dir",
                    journal.name
                )));
            }
            if !names.insert(journal.name.as_str()) {
                return Err(ConfigError::InvalidConfig(format!(
                    "journal '{}' is listed more than once",
                    journal.name
                )));
            }
        }
        Ok(())
    }

    pub fn journal(&self, name: &str) -> Option<&JournalConfig> {
        self.journals.iter().find(|j| j.name == name)
    }

    /// Conversion jobs for every configured journal, in file order
    pub fn jobs(&self) -> Vec<JournalJob> {
        self.journals
            .iter()
            .map(|journal| journal.to_job(&self.default_tags))
            .collect()
    }
}
