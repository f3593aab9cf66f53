//! Pipeline assembly from configuration and command line arguments

use debforge_builder::{
    BackendConfig, BuildContext, BuildEnvironment, ChangelogSettings, ChrootBuilder,
    SourcePackagePreparer,
};
use debforge_changelog::FileChangelogStore;
use debforge_config::{BackendSettings, Config};
use debforge_errors::Error;
use debforge_platform::{ProcessRunner, TokioProcessRunner};
use debforge_types::{
    package_version, source_package_filename, FixedRevision, OriginTarball, Project,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::{RevisionArgs, TargetArgs};

/// Everything a run needs, resolved from config and arguments
pub struct RunSetup<'a> {
    pub project: Project,
    pub revision: FixedRevision,
    pub backend_name: String,
    pub backend: &'a BackendSettings,
    pub environment: BuildEnvironment,
    pub runner: Arc<dyn ProcessRunner>,
}

impl<'a> RunSetup<'a> {
    /// Resolve the project and backend sections named on the command line
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown or incomplete sections.
    pub fn resolve(
        config: &'a Config,
        target: &TargetArgs,
        revision: &RevisionArgs,
    ) -> Result<Self, Error> {
        let project = config.project(&target.project)?;
        let backend = config.backend(&target.backend)?;
        let revision = fixed_revision(&project, revision);
        let environment = BuildEnvironment::new(&project, &revision);
        let runner =
            Arc::new(TokioProcessRunner::new().with_timeout(config.general.timeout_seconds));

        Ok(Self {
            project,
            revision,
            backend_name: target.backend.clone(),
            backend,
            environment,
            runner,
        })
    }

    /// Source package preparer for `orig`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` without changelog author or entry.
    pub fn preparer(
        &self,
        orig: &Path,
        context: BuildContext,
    ) -> Result<SourcePackagePreparer, Error> {
        let changelog = ChangelogSettings::from_settings(&self.backend_name, self.backend)?;
        Ok(SourcePackagePreparer::new(
            self.project.clone(),
            OriginTarball::new(orig),
            Arc::new(self.revision.clone()),
            changelog,
            self.environment.clone(),
            Arc::clone(&self.runner),
            Arc::new(FileChangelogStore),
            context,
        ))
    }

    /// Binary-build backend, run from the build directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when a chroot backend lacks its
    /// build base or output directory.
    pub fn backend(&self, context: BuildContext) -> Result<ChrootBuilder, Error> {
        let config = BackendConfig::from_settings(&self.backend_name, self.backend)?;
        Ok(ChrootBuilder::new(
            config,
            self.environment.clone(),
            self.project.build_dir(),
            Arc::clone(&self.runner),
            context,
        ))
    }

    /// Descriptor path a successful prepare records
    #[must_use]
    pub fn expected_source_package(&self) -> PathBuf {
        let version = package_version(&self.revision.version, &self.revision.fancy_revision);
        self.project
            .build_dir()
            .join(source_package_filename(&self.project.name, &version))
    }
}

/// Fill unset revision fields from the project
#[must_use]
pub fn fixed_revision(project: &Project, args: &RevisionArgs) -> FixedRevision {
    let name = args.vcs_name.clone().unwrap_or_else(|| project.name.clone());
    let version = args
        .vcs_version
        .clone()
        .unwrap_or_else(|| project.version.clone());
    let checkout_dir_name = args
        .checkout_dir
        .clone()
        .unwrap_or_else(|| format!("{name}-{version}"));

    FixedRevision {
        revision: args.revision.clone(),
        name,
        version,
        fancy_revision: args.fancy_revision.clone(),
        checkout_dir_name,
    }
}
