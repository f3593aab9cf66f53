//! Build pipeline error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("unsupported archive format: {path} (only gzip and bzip2 tarballs are supported)")]
    UnsupportedArchiveFormat { path: String },

    #[error("no builder binary configured for backend {backend}")]
    NotConfigured { backend: String },

    #[error("no source package to build: prepare must succeed before the binary build")]
    PreparationRequired,

    #[error("extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("failed to start {program}: {message}")]
    ProcessSpawnFailed { program: String, message: String },

    #[error("{program} timed out after {seconds} seconds")]
    Timeout { program: String, seconds: u64 },

    #[error("{program} was cancelled")]
    Cancelled { program: String },

    #[error("{program} was terminated by a signal")]
    TerminatedBySignal { program: String },
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedArchiveFormat { .. } => {
                Some("Provide the orig tarball as .tar.gz or .tar.bz2.")
            }
            Self::NotConfigured { .. } => {
                Some("Set builder_command for this backend in the configuration file.")
            }
            Self::PreparationRequired => {
                Some("Run the prepare phase and check that dpkg-buildpackage exited with 0.")
            }
            Self::ProcessSpawnFailed { .. } => {
                Some("Check that the tool is installed and present in PATH.")
            }
            Self::Timeout { .. } => Some("Increase timeout_seconds in the configuration."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Cancelled { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::UnsupportedArchiveFormat { .. } => "build.unsupported_archive_format",
            Self::NotConfigured { .. } => "build.not_configured",
            Self::PreparationRequired => "build.preparation_required",
            Self::ExtractionFailed { .. } => "build.extraction_failed",
            Self::ProcessSpawnFailed { .. } => "build.process_spawn_failed",
            Self::Timeout { .. } => "build.timeout",
            Self::Cancelled { .. } => "build.cancelled",
            Self::TerminatedBySignal { .. } => "build.terminated_by_signal",
        };
        Some(code)
    }
}
