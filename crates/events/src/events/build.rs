use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Pipeline phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase {
    /// Staging, changelog update and source package creation
    Prepare,
    /// Binary build through the configured backend
    Build,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prepare => write!(f, "prepare"),
            Self::Build => write!(f, "build"),
        }
    }
}

/// Packaging pipeline events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildEvent {
    /// Pipeline phase started
    PhaseStarted {
        session_id: String,
        package: String,
        phase: BuildPhase,
    },

    /// Pipeline phase finished; a non-zero exit code is still a completion
    PhaseCompleted {
        session_id: String,
        package: String,
        phase: BuildPhase,
        exit_code: i32,
        duration: Duration,
    },

    /// Pipeline phase aborted with an error
    PhaseFailed {
        session_id: String,
        package: String,
        phase: BuildPhase,
        error: String,
    },

    /// Orig tarball unpacked into the build directory
    SourcesExtracted {
        package: String,
        archive: PathBuf,
        destination: PathBuf,
    },

    /// New changelog block written
    ChangelogUpdated {
        package: String,
        version: String,
        distribution: String,
    },

    /// Source package descriptor recorded after a successful source build
    SourcePackageReady { package: String, path: PathBuf },

    /// External command started
    CommandStarted {
        package: String,
        command: String,
        working_dir: PathBuf,
    },

    /// External command finished
    CommandCompleted {
        package: String,
        command: String,
        exit_code: Option<i32>,
        duration: Duration,
    },
}
