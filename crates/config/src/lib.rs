#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for debforge
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/debforge/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod backend;
pub mod project;

pub use backend::BackendSettings;
pub use project::ProjectConfig;

use debforge_errors::{ConfigError, Error};
use debforge_types::{OutputFormat, Project};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    /// Per-project sections, keyed by the name passed on the command line
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectConfig>,

    /// Per-backend sections, keyed by the name passed on the command line
    #[serde(default)]
    pub backends: BTreeMap<String, BackendSettings>,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub log_format: OutputFormat,
    /// Upper bound for each external tool invocation; unset means no limit
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: OutputFormat::Plain,
            timeout_seconds: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("debforge").join("config.toml"))
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::from_toml(&contents)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with process environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge with environment variables read through `lookup`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value that cannot be parsed.
    pub fn merge_env_from<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // DEBFORGE_WORK_DIR
        if let Some(work_dir) = lookup("DEBFORGE_WORK_DIR") {
            for project in self.projects.values_mut() {
                project.work_dir = Some(PathBuf::from(&work_dir));
            }
        }

        // DEBFORGE_OUTPUT_DIR
        if let Some(output_dir) = lookup("DEBFORGE_OUTPUT_DIR") {
            for backend in self.backends.values_mut() {
                backend.output_dir = Some(PathBuf::from(&output_dir));
            }
        }

        // DEBFORGE_TIMEOUT
        if let Some(timeout) = lookup("DEBFORGE_TIMEOUT") {
            let seconds: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "DEBFORGE_TIMEOUT".to_string(),
                value: timeout.clone(),
            })?;
            self.general.timeout_seconds = (seconds > 0).then_some(seconds);
        }

        // DEBFORGE_LOG_FORMAT
        if let Some(format) = lookup("DEBFORGE_LOG_FORMAT") {
            self.general.log_format = match format.as_str() {
                "plain" => OutputFormat::Plain,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "DEBFORGE_LOG_FORMAT".to_string(),
                        value: format,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }

    /// Resolve a project section into a [`Project`]
    ///
    /// # Errors
    ///
    /// Returns an error if the section is missing or incomplete.
    pub fn project(&self, name: &str) -> Result<Project, Error> {
        let section = self
            .projects
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProject {
                name: name.to_string(),
            })?;
        section.to_project(name)
    }

    /// Look up a backend section
    ///
    /// # Errors
    ///
    /// Returns an error if no section with this name exists.
    pub fn backend(&self, name: &str) -> Result<&BackendSettings, Error> {
        self.backends.get(name).ok_or_else(|| {
            ConfigError::UnknownBackend {
                name: name.to_string(),
            }
            .into()
        })
    }
}
