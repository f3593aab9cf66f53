//! Per-project configuration sections

use debforge_errors::{ConfigError, Error};
use debforge_types::Project;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[projects.<name>]`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    /// Package name; defaults to the section name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub package_template: Option<PathBuf>,
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
}

impl ProjectConfig {
    /// Build the immutable [`Project`] for a run
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for an absent version, template
    /// or work directory.
    pub fn to_project(&self, section: &str) -> Result<Project, Error> {
        let missing = |field: &str| ConfigError::MissingField {
            field: format!("projects.{section}.{field}"),
        };

        let version = self.version.clone().ok_or_else(|| missing("version"))?;
        let package_template = self
            .package_template
            .clone()
            .ok_or_else(|| missing("package_template"))?;
        let work_dir = self.work_dir.clone().ok_or_else(|| missing("work_dir"))?;

        Ok(Project::new(
            self.name.clone().unwrap_or_else(|| section.to_string()),
            version,
            package_template,
            work_dir,
        ))
    }
}
