//! Binary-build backend kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backends that turn a source package into binary packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Runs whatever binary is configured, with no default options
    #[default]
    Plain,
    /// `pbuilder` with a base tarball
    Pbuilder,
    /// `cowbuilder` with a base directory
    Cowbuilder,
}

impl BackendKind {
    /// Binary used when the configuration names none
    #[must_use]
    pub fn default_binary(self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Pbuilder => Some("pbuilder"),
            Self::Cowbuilder => Some("cowbuilder"),
        }
    }

    /// Whether this backend builds inside a chroot base image
    #[must_use]
    pub fn is_chroot(self) -> bool {
        !matches!(self, Self::Plain)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Pbuilder => "pbuilder",
            Self::Cowbuilder => "cowbuilder",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "pbuilder" => Ok(Self::Pbuilder),
            "cowbuilder" => Ok(Self::Cowbuilder),
            other => Err(format!("unknown backend kind: {other}")),
        }
    }
}
