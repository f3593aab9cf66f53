//! Source package preparation
//!
//! Stages the orig tarball and packaging template under `<work dir>/build`,
//! records a new changelog release and runs `dpkg-buildpackage -S` in the
//! unpacked tree.

use chrono::{DateTime, FixedOffset, Local};
use debforge_changelog::{ChangelogEntry, ChangelogStore};
use debforge_config::BackendSettings;
use debforge_errors::Error;
use debforge_events::{AppEvent, BuildEvent, EventEmitter};
use debforge_platform::{copy_directory_recursive, PlatformCommand, ProcessRunner};
use debforge_types::{
    orig_tarball_filename, package_version, source_package_filename, OriginTarball, Project,
    VcsRevision,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;

use crate::archive::extract_tarball;
use crate::context::BuildContext;
use crate::environment::BuildEnvironment;

/// Program that builds the source package
pub const SOURCE_PACKAGE_TOOL: &str = "dpkg-buildpackage";
/// Unsigned source-only build
pub const SOURCE_PACKAGE_ARGS: [&str; 3] = ["-us", "-uc", "-S"];

/// What goes into the new changelog release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogSettings {
    pub distribution: String,
    pub urgency: String,
    pub author: String,
    pub entry: String,
}

impl ChangelogSettings {
    /// Read the changelog fields of a `[backends.<name>]` section
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` without an author or entry text.
    pub fn from_settings(name: &str, settings: &BackendSettings) -> Result<Self, Error> {
        Ok(Self {
            distribution: settings.changelog_distribution.clone(),
            urgency: settings.changelog_urgency.clone(),
            author: settings.author(name)?.to_string(),
            entry: settings.entry(name)?.to_string(),
        })
    }
}

/// Materializes the source tree and builds the source package
pub struct SourcePackagePreparer {
    project: Project,
    tarball: OriginTarball,
    revision: Arc<dyn VcsRevision>,
    changelog: ChangelogSettings,
    environment: BuildEnvironment,
    runner: Arc<dyn ProcessRunner>,
    store: Arc<dyn ChangelogStore>,
    context: BuildContext,
    timestamp: Option<DateTime<FixedOffset>>,
    source_package: Option<PathBuf>,
}

impl SourcePackagePreparer {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        project: Project,
        tarball: OriginTarball,
        revision: Arc<dyn VcsRevision>,
        changelog: ChangelogSettings,
        environment: BuildEnvironment,
        runner: Arc<dyn ProcessRunner>,
        store: Arc<dyn ChangelogStore>,
        context: BuildContext,
    ) -> Self {
        Self {
            project,
            tarball,
            revision,
            changelog,
            environment,
            runner,
            store,
            context,
            timestamp: None,
            source_package: None,
        }
    }

    /// Fix the changelog timestamp instead of reading the local clock
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    #[must_use]
    pub fn environment(&self) -> &BuildEnvironment {
        &self.environment
    }

    /// Version written to the changelog
    #[must_use]
    pub fn package_version(&self) -> String {
        package_version(&self.revision.version(), &self.revision.fancy_revision())
    }

    /// Root of the unpacked source tree
    #[must_use]
    pub fn source_tree(&self) -> PathBuf {
        self.project
            .build_dir()
            .join(self.revision.checkout_dir_name())
    }

    /// Descriptor path; set only after a successful [`Self::prepare`]
    #[must_use]
    pub fn source_package_path(&self) -> Option<&Path> {
        self.source_package.as_deref()
    }

    /// Stage sources and build the source package
    ///
    /// Returns the exit code of `dpkg-buildpackage`. The descriptor path is
    /// recorded only when it is 0.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported or unreadable tarball, filesystem
    /// failures while staging, changelog errors, and process failures.
    pub async fn prepare(&mut self) -> Result<i32, Error> {
        self.source_package = None;

        let compression = self.tarball.compression()?;
        let build_dir = self.project.build_dir();
        fs::create_dir_all(&build_dir)
            .await
            .map_err(|e| Error::io_with_path(&e, &build_dir))?;

        extract_tarball(self.tarball.path(), compression, &build_dir).await?;
        self.context.emit(AppEvent::Build(BuildEvent::SourcesExtracted {
            package: self.project.name.clone(),
            archive: self.tarball.path().to_path_buf(),
            destination: build_dir.clone(),
        }));

        let orig_name = orig_tarball_filename(
            &self.revision.name(),
            &self.revision.version(),
            &self.revision.fancy_revision(),
            compression,
        );
        let orig_path = build_dir.join(&orig_name);
        fs::copy(self.tarball.path(), &orig_path)
            .await
            .map_err(|e| Error::io_with_path(&e, self.tarball.path()))?;
        self.context
            .emit_debug(format!("staged orig tarball as {}", orig_path.display()));

        let tree = self.source_tree();
        let debian_dir = tree.join("debian");
        copy_directory_recursive(&self.project.package_template, &debian_dir).await?;

        let version = self.package_version();
        self.add_changelog_entry(&debian_dir.join("changelog"), &version)
            .await?;

        let code = self.build_source_package(&tree).await?;
        if code == 0 {
            let descriptor =
                build_dir.join(source_package_filename(&self.project.name, &version));
            self.context.emit(AppEvent::Build(BuildEvent::SourcePackageReady {
                package: self.project.name.clone(),
                path: descriptor.clone(),
            }));
            self.source_package = Some(descriptor);
        } else {
            self.context.emit_warning(format!(
                "{SOURCE_PACKAGE_TOOL} exited with code {code}; no source package recorded"
            ));
        }
        Ok(code)
    }

    async fn add_changelog_entry(&self, path: &Path, version: &str) -> Result<(), Error> {
        let mut changelog = self.store.load(path).await?;
        let entry = ChangelogEntry {
            package: self.project.name.clone(),
            version: version.to_string(),
            distribution: self.changelog.distribution.clone(),
            urgency: self.changelog.urgency.clone(),
            author: self.changelog.author.clone(),
            timestamp: self
                .timestamp
                .unwrap_or_else(|| Local::now().fixed_offset()),
            changes: vec![self.changelog.entry.clone()],
        };
        changelog.add_entry(&entry);
        self.store.write(path, &changelog).await?;

        self.context.emit(AppEvent::Build(BuildEvent::ChangelogUpdated {
            package: entry.package,
            version: entry.version,
            distribution: entry.distribution,
        }));
        Ok(())
    }

    async fn build_source_package(&self, tree: &Path) -> Result<i32, Error> {
        let command = PlatformCommand::new(SOURCE_PACKAGE_TOOL)
            .args(SOURCE_PACKAGE_ARGS)
            .envs(self.environment.env_vars().clone())
            .current_dir(tree);
        let display = command.to_string();

        self.context.emit_debug_with_context(
            "building source package",
            self.environment.environment_summary(),
        );
        self.context
            .emit_command_started(&self.project.name, &display, tree.to_path_buf());

        let start = Instant::now();
        let result = self.runner.run(&command, &self.context.cancel).await;

        self.context.emit_command_completed(
            &self.project.name,
            &display,
            result.as_ref().ok().copied(),
            start.elapsed(),
        );
        result
    }
}
