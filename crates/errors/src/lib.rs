#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for debforge
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone so they can travel inside events.

use std::borrow::Cow;

use thiserror::Error;

pub mod build;
pub mod changelog;
pub mod config;
pub mod platform;

// Re-export all error types at the root
pub use build::BuildError;
pub use changelog::ChangelogError;
pub use config::ConfigError;
pub use platform::PlatformError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("changelog error: {0}")]
    Changelog(#[from] ChangelogError),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }

    /// The I/O error kind, if this is a filesystem failure
    #[must_use]
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(ConfigError::ParseError {
            message: err.to_string(),
        })
    }
}

/// Result type alias for debforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Build(err) => err.user_message(),
            Error::Io { message, path, .. } => match path {
                Some(path) => Cow::Owned(format!("{message} ({})", path.display())),
                None => Cow::Borrowed(message.as_str()),
            },
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Build(err) => err.user_hint(),
            Error::Changelog(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::Platform(err) => err.user_hint(),
            Error::Io {
                kind: std::io::ErrorKind::AlreadyExists,
                ..
            } => Some("Clean the build directory before preparing again."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Build(err) => err.is_retryable(),
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Build(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Changelog(err) => err.user_code(),
            Error::Platform(err) => err.user_code(),
            Error::Io { .. } => Some("error.io"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_keeps_kind_and_path() {
        let io = std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists");
        let err = Error::io_with_path(&io, "/tmp/build/debian");

        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::AlreadyExists));
        assert!(err.user_message().contains("/tmp/build/debian"));
        assert_eq!(err.user_code(), Some("error.io"));
        assert!(err.user_hint().is_some());
    }

    #[test]
    fn build_errors_are_distinguishable() {
        let not_configured: Error = BuildError::NotConfigured {
            backend: "plain".to_string(),
        }
        .into();
        let preparation: Error = BuildError::PreparationRequired.into();

        assert_eq!(not_configured.user_code(), Some("build.not_configured"));
        assert_eq!(preparation.user_code(), Some("build.preparation_required"));
        assert!(!not_configured.is_retryable());
        assert!(!preparation.is_retryable());
    }

    #[test]
    fn toml_errors_become_config_parse_errors() {
        let err: Error = toml::from_str::<toml::Table>("not = [valid")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }
}
