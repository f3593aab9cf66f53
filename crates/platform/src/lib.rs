#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform abstraction layer for debforge
//!
//! This crate provides the operating-system seams used by the build pipeline:
//! - Process execution with cancellation and an optional timeout
//! - Filesystem helpers for staging packaging templates
//!
//! Process execution sits behind the [`ProcessRunner`] trait so pipeline code
//! can be exercised without launching real packaging tools.

pub mod filesystem;
pub mod process;

pub use filesystem::copy_directory_recursive;
pub use process::{PlatformCommand, ProcessRunner, TokioProcessRunner};

/// Re-exported so callers need no direct dependency on `tokio-util`
pub use tokio_util::sync::CancellationToken;
