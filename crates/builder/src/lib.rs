#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]
//! Debian package building for debforge
//!
//! This crate stages an orig tarball with its packaging template, records a
//! changelog release, builds the source package and hands the resulting
//! descriptor to a configurable binary-build backend.

mod archive;
mod backend;
mod context;
mod environment;
mod orchestrator;
mod source;

pub use archive::extract_tarball;
pub use backend::{BackendConfig, BuildCommand, BuilderBackend, ChrootBuilder};
pub use context::BuildContext;
pub use environment::{BuildEnvironment, PROJECT_NAME, PROJECT_REVISION, PROJECT_VERSION};
pub use orchestrator::BuildOrchestrator;
pub use source::{
    ChangelogSettings, SourcePackagePreparer, SOURCE_PACKAGE_ARGS, SOURCE_PACKAGE_TOOL,
};
