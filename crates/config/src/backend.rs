//! Per-backend configuration sections

use debforge_errors::{ConfigError, Error};
use debforge_types::BackendKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[backends.<name>]`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendSettings {
    /// Explicit backend kind; inferred from the section name when absent
    #[serde(default)]
    pub kind: Option<BackendKind>,
    /// Where produced binary packages land
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Chroot base (tarball for pbuilder, directory for cowbuilder)
    #[serde(default)]
    pub buildbase: Option<PathBuf>,
    /// Builder binary plus leading arguments, e.g. `["sudo", "pbuilder"]`
    #[serde(default)]
    pub builder_command: Vec<String>,
    /// Extra arguments placed after the backend defaults
    #[serde(default)]
    pub builder_arguments: Vec<String>,
    #[serde(default = "default_distribution")]
    pub changelog_distribution: String,
    #[serde(default = "default_urgency")]
    pub changelog_urgency: String,
    #[serde(default)]
    pub changelog_author: Option<String>,
    #[serde(default)]
    pub changelog_entry: Option<String>,
}

fn default_distribution() -> String {
    "unstable".to_string()
}

fn default_urgency() -> String {
    "low".to_string()
}

impl BackendSettings {
    /// Backend kind for the section `name`
    ///
    /// An explicit `kind` wins, then a section named after a known kind,
    /// then [`BackendKind::Plain`].
    #[must_use]
    pub fn resolved_kind(&self, name: &str) -> BackendKind {
        self.kind
            .or_else(|| name.parse().ok())
            .unwrap_or_default()
    }

    /// Changelog author, required for source preparation
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when unset.
    pub fn author(&self, name: &str) -> Result<&str, Error> {
        self.changelog_author.as_deref().ok_or_else(|| {
            ConfigError::MissingField {
                field: format!("backends.{name}.changelog_author"),
            }
            .into()
        })
    }

    /// Changelog entry text, required for source preparation
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when unset.
    pub fn entry(&self, name: &str) -> Result<&str, Error> {
        self.changelog_entry.as_deref().ok_or_else(|| {
            ConfigError::MissingField {
                field: format!("backends.{name}.changelog_entry"),
            }
            .into()
        })
    }
}
