//! Changelog persistence

use async_trait::async_trait;
use debforge_errors::Error;
use std::path::Path;
use tokio::fs;

use crate::parse::Changelog;

/// Loads and writes changelog files
#[async_trait]
pub trait ChangelogStore: Send + Sync {
    /// Read and parse the changelog at `path`
    async fn load(&self, path: &Path) -> Result<Changelog, Error>;

    /// Replace the changelog at `path`
    async fn write(&self, path: &Path, changelog: &Changelog) -> Result<(), Error>;
}

/// [`ChangelogStore`] over plain files
#[derive(Debug, Clone, Copy, Default)]
pub struct FileChangelogStore;

#[async_trait]
impl ChangelogStore for FileChangelogStore {
    async fn load(&self, path: &Path) -> Result<Changelog, Error> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;
        Ok(Changelog::parse(&text)?)
    }

    async fn write(&self, path: &Path, changelog: &Changelog) -> Result<(), Error> {
        fs::write(path, changelog.render())
            .await
            .map_err(|e| Error::io_with_path(&e, path))
    }
}
