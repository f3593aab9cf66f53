//! Project description

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the staging directory below the work directory
pub const BUILD_DIR_NAME: &str = "build";

/// A packaged project; immutable for the lifetime of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub version: String,
    /// Directory copied verbatim into the unpacked tree as `debian/`
    pub package_template: PathBuf,
    pub work_dir: PathBuf,
}

impl Project {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        package_template: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            package_template: package_template.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Directory the orig tarball is unpacked into
    #[must_use]
    pub fn build_dir(&self) -> PathBuf {
        self.work_dir.join(BUILD_DIR_NAME)
    }

    #[must_use]
    pub fn package_template(&self) -> &Path {
        &self.package_template
    }
}
