//! Binary-build backends
//!
//! Every backend kind is the same runner fed a different [`BackendConfig`]:
//! the kind only decides the default binary and the default options placed
//! in front of the user arguments.

use async_trait::async_trait;
use debforge_config::BackendSettings;
use debforge_errors::{BuildError, ConfigError, Error};
use debforge_events::EventEmitter;
use debforge_platform::{PlatformCommand, ProcessRunner};
use debforge_types::BackendKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::context::BuildContext;
use crate::environment::BuildEnvironment;

/// Backend configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Section name, used in error messages
    pub name: String,
    pub kind: BackendKind,
    /// Explicit binary plus leading arguments; empty selects the kind default
    pub binary: Vec<String>,
    /// User arguments placed after the default options
    pub extra_args: Vec<String>,
    /// Chroot base tarball (pbuilder) or directory (cowbuilder)
    pub buildbase: Option<PathBuf>,
    /// Result directory for built packages
    pub output_dir: Option<PathBuf>,
}

impl BackendConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: BackendKind) -> Self {
        Self {
            name: name.into(),
            kind,
            binary: Vec::new(),
            extra_args: Vec::new(),
            buildbase: None,
            output_dir: None,
        }
    }

    /// Build from a `[backends.<name>]` section
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when a chroot backend lacks its
    /// build base or output directory.
    pub fn from_settings(name: &str, settings: &BackendSettings) -> Result<Self, Error> {
        let config = Self {
            name: name.to_string(),
            kind: settings.resolved_kind(name),
            binary: settings.builder_command.clone(),
            extra_args: settings.builder_arguments.clone(),
            buildbase: settings.buildbase.clone(),
            output_dir: settings.output_dir.clone(),
        };
        config.default_options()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_binary<I, S>(mut self, binary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.binary = binary.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_buildbase(mut self, buildbase: impl Into<PathBuf>) -> Self {
        self.buildbase = Some(buildbase.into());
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    /// Binary plus leading arguments; explicit configuration wins
    ///
    /// # Errors
    ///
    /// Returns `BuildError::NotConfigured` when neither the configuration nor
    /// the kind names a binary.
    pub fn resolved_binary(&self) -> Result<Vec<String>, Error> {
        if !self.binary.is_empty() {
            return Ok(self.binary.clone());
        }
        self.kind
            .default_binary()
            .map(|binary| vec![binary.to_string()])
            .ok_or_else(|| {
                BuildError::NotConfigured {
                    backend: self.name.clone(),
                }
                .into()
            })
    }

    /// Options the kind always passes
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when a chroot kind lacks its build
    /// base or output directory.
    pub fn default_options(&self) -> Result<Vec<String>, Error> {
        let base_flag = match self.kind {
            BackendKind::Plain => return Ok(Vec::new()),
            BackendKind::Pbuilder => "--basetgz",
            BackendKind::Cowbuilder => "--basepath",
        };

        let require = |value: &Option<PathBuf>, field: &str| {
            value
                .as_ref()
                .map(|path| path.display().to_string())
                .ok_or_else(|| ConfigError::MissingField {
                    field: format!("backends.{}.{field}", self.name),
                })
        };
        let buildbase = require(&self.buildbase, "buildbase")?;
        let output_dir = require(&self.output_dir, "output_dir")?;

        Ok(vec![
            "--build".to_string(),
            base_flag.to_string(),
            buildbase,
            "--buildresult".to_string(),
            output_dir,
        ])
    }
}

/// A composed binary-build invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    /// binary ++ default options ++ user arguments ++ descriptor
    pub argv: Vec<String>,
    pub environment: BuildEnvironment,
    pub working_dir: PathBuf,
}

impl BuildCommand {
    /// Convert into a runnable command
    #[must_use]
    pub fn to_platform_command(&self) -> PlatformCommand {
        let (program, args) = self
            .argv
            .split_first()
            .map_or(("", &[][..]), |(program, args)| (program.as_str(), args));
        PlatformCommand::new(program)
            .args(args)
            .envs(self.environment.env_vars().clone())
            .current_dir(&self.working_dir)
    }

    /// Space-joined argv
    #[must_use]
    pub fn display(&self) -> String {
        self.argv.join(" ")
    }
}

/// Turns a source package descriptor into binary packages
#[async_trait]
pub trait BuilderBackend: Send + Sync {
    /// Compose the invocation without running it
    ///
    /// # Errors
    ///
    /// Returns `BuildError::NotConfigured` without a binary and
    /// `BuildError::PreparationRequired` without a descriptor.
    fn command(&self, source_package: Option<&Path>) -> Result<BuildCommand, Error>;

    /// Run the build and return the tool's exit code unmodified
    ///
    /// # Errors
    ///
    /// Returns the errors of [`BuilderBackend::command`] and process failures.
    async fn build(&self, source_package: Option<&Path>) -> Result<i32, Error>;
}

/// The single runner behind every [`BackendKind`]
pub struct ChrootBuilder {
    config: BackendConfig,
    environment: BuildEnvironment,
    working_dir: PathBuf,
    runner: Arc<dyn ProcessRunner>,
    context: BuildContext,
}

impl ChrootBuilder {
    #[must_use]
    pub fn new(
        config: BackendConfig,
        environment: BuildEnvironment,
        working_dir: impl Into<PathBuf>,
        runner: Arc<dyn ProcessRunner>,
        context: BuildContext,
    ) -> Self {
        Self {
            config,
            environment,
            working_dir: working_dir.into(),
            runner,
            context,
        }
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

#[async_trait]
impl BuilderBackend for ChrootBuilder {
    fn command(&self, source_package: Option<&Path>) -> Result<BuildCommand, Error> {
        let mut argv = self.config.resolved_binary()?;

        let source_package = source_package
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(BuildError::PreparationRequired)?;

        argv.extend(self.config.default_options()?);
        argv.extend(self.config.extra_args.iter().cloned());
        argv.push(source_package.display().to_string());

        Ok(BuildCommand {
            argv,
            environment: self.environment.clone(),
            working_dir: self.working_dir.clone(),
        })
    }

    async fn build(&self, source_package: Option<&Path>) -> Result<i32, Error> {
        let command = self.command(source_package)?;
        let display = command.display();

        self.context.emit_debug_with_context(
            format!("running {} backend", self.config.kind),
            self.environment.environment_summary(),
        );
        self.context.emit_command_started(
            &self.context.package,
            &display,
            command.working_dir.clone(),
        );

        let start = Instant::now();
        let result = self
            .runner
            .run(&command.to_platform_command(), &self.context.cancel)
            .await;

        self.context.emit_command_completed(
            &self.context.package,
            &display,
            result.as_ref().ok().copied(),
            start.elapsed(),
        );
        result
    }
}
