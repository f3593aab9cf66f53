//! Debian version and file naming rules

use crate::ArchiveCompression;

/// Debian revision appended to every generated package version
const DEBIAN_REVISION: &str = "1";

/// Package version written to the changelog: `<version>+<fancy revision>-1`
#[must_use]
pub fn package_version(upstream_version: &str, fancy_revision: &str) -> String {
    format!("{upstream_version}+{fancy_revision}-{DEBIAN_REVISION}")
}

/// Canonical orig tarball name:
/// `<name>_<version>+<fancy revision>.orig.tar<.gz|.bz2>`
#[must_use]
pub fn orig_tarball_filename(
    name: &str,
    upstream_version: &str,
    fancy_revision: &str,
    compression: ArchiveCompression,
) -> String {
    format!(
        "{name}_{upstream_version}+{fancy_revision}.orig.tar{}",
        compression.extension()
    )
}

/// Source package descriptor name: `<name>_<package version>.dsc`
#[must_use]
pub fn source_package_filename(name: &str, package_version: &str) -> String {
    format!("{name}_{package_version}.dsc")
}
