//! Version-control metadata consumed by the pipeline

use serde::{Deserialize, Serialize};

/// Read-only view of the checked-out revision
///
/// Retrieval lives outside debforge; callers hand in whatever implements this.
pub trait VcsRevision: Send + Sync {
    /// Revision identifier exported as `PROJECT_REVISION`
    fn revision(&self) -> String;

    /// Canonical source name used for the orig tarball
    fn name(&self) -> String;

    /// Canonical upstream version
    fn version(&self) -> String;

    /// Short disambiguating suffix, e.g. an abbreviated commit hash
    fn fancy_revision(&self) -> String;

    /// Top-level directory name of the unpacked tarball
    fn checkout_dir_name(&self) -> String;
}

/// Revision metadata supplied verbatim by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedRevision {
    pub revision: String,
    pub name: String,
    pub version: String,
    pub fancy_revision: String,
    pub checkout_dir_name: String,
}

impl VcsRevision for FixedRevision {
    fn revision(&self) -> String {
        self.revision.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn version(&self) -> String {
        self.version.clone()
    }

    fn fancy_revision(&self) -> String {
        self.fancy_revision.clone()
    }

    fn checkout_dir_name(&self) -> String {
        self.checkout_dir_name.clone()
    }
}
