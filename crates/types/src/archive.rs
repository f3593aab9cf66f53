//! Orig tarball and its compression kind

use debforge_errors::{BuildError, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Compression kinds accepted for orig tarballs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveCompression {
    Gzip,
    Bzip2,
}

impl ArchiveCompression {
    /// Derive the compression from a file name suffix
    ///
    /// A name ending in `bz2` is bzip2, a name ending in `gz` is gzip. The
    /// match is case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::UnsupportedArchiveFormat` for any other suffix.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if name.ends_with("bz2") {
            Ok(Self::Bzip2)
        } else if name.ends_with("gz") {
            Ok(Self::Gzip)
        } else {
            Err(BuildError::UnsupportedArchiveFormat {
                path: path.display().to_string(),
            }
            .into())
        }
    }

    /// Extension appended after `.orig.tar`
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gzip => ".gz",
            Self::Bzip2 => ".bz2",
        }
    }
}

impl fmt::Display for ArchiveCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gzip => write!(f, "gzip"),
            Self::Bzip2 => write!(f, "bzip2"),
        }
    }
}

/// The unmodified upstream source archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginTarball {
    path: PathBuf,
}

impl OriginTarball {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compression kind of this tarball
    ///
    /// # Errors
    ///
    /// Returns `BuildError::UnsupportedArchiveFormat` when the suffix is not
    /// gzip or bzip2.
    pub fn compression(&self) -> Result<ArchiveCompression, Error> {
        ArchiveCompression::from_path(&self.path)
    }
}
