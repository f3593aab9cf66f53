#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for debforge
//!
//! This crate provides the values passed read-only through a packaging run:
//! the project description, the orig tarball, version-control metadata and
//! the Debian naming rules derived from them.

pub mod archive;
pub mod backend;
pub mod naming;
pub mod project;
pub mod revision;

pub use archive::{ArchiveCompression, OriginTarball};
pub use backend::BackendKind;
pub use naming::{orig_tarball_filename, package_version, source_package_filename};
pub use project::Project;
pub use revision::{FixedRevision, VcsRevision};

use serde::{Deserialize, Serialize};

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable log lines
    #[default]
    Plain,
    /// JSON log records
    Json,
}
