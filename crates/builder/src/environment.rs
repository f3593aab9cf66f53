//! Environment for packaging tool invocations

use debforge_types::{Project, VcsRevision};
use std::collections::{BTreeMap, HashMap};

pub const PROJECT_NAME: &str = "PROJECT_NAME";
pub const PROJECT_VERSION: &str = "PROJECT_VERSION";
pub const PROJECT_REVISION: &str = "PROJECT_REVISION";

/// Ambient process environment plus the project-identifying variables
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildEnvironment {
    vars: BTreeMap<String, String>,
}

impl BuildEnvironment {
    /// Build from the current process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    #[must_use]
    pub fn new(project: &Project, revision: &dyn VcsRevision) -> Self {
        let ambient = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        Self::from_vars(ambient, project, revision)
    }

    /// Build from an explicit ambient environment
    #[must_use]
    pub fn from_vars<I, K, V>(ambient: I, project: &Project, revision: &dyn VcsRevision) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars: BTreeMap<String, String> = ambient
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        vars.insert(PROJECT_NAME.to_string(), project.name.clone());
        vars.insert(PROJECT_VERSION.to_string(), project.version.clone());
        vars.insert(PROJECT_REVISION.to_string(), revision.revision());
        Self { vars }
    }

    /// All variables
    #[must_use]
    pub fn env_vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// The project variables, for debug events
    #[must_use]
    pub fn environment_summary(&self) -> HashMap<String, String> {
        [PROJECT_NAME, PROJECT_VERSION, PROJECT_REVISION]
            .into_iter()
            .filter_map(|key| Some((key.to_string(), self.vars.get(key)?.clone())))
            .collect()
    }
}
