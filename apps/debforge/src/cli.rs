//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// debforge - two-phase Debian package builder
#[derive(Parser)]
#[command(name = "debforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build Debian packages from an orig tarball and a packaging template")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Args)]
pub struct GlobalArgs {
    /// Emit JSON log records
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build the source package, then the binary packages
    Build {
        #[command(flatten)]
        target: TargetArgs,

        /// Upstream orig tarball (.tar.gz or .tar.bz2)
        #[arg(long, value_name = "PATH")]
        orig: PathBuf,

        #[command(flatten)]
        revision: RevisionArgs,
    },

    /// Only build the source package and print the descriptor path
    Prepare {
        #[command(flatten)]
        target: TargetArgs,

        /// Upstream orig tarball (.tar.gz or .tar.bz2)
        #[arg(long, value_name = "PATH")]
        orig: PathBuf,

        #[command(flatten)]
        revision: RevisionArgs,
    },

    /// Print the binary build command without running it
    ShowCommand {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        revision: RevisionArgs,

        /// Descriptor to build (defaults to the one prepare would record)
        #[arg(long, value_name = "PATH")]
        dsc: Option<PathBuf>,
    },
}

/// Which configuration sections to use
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Project section name in the config file
    #[arg(long)]
    pub project: String,

    /// Backend section name in the config file
    #[arg(long)]
    pub backend: String,
}

/// Version-control metadata of the checkout being packaged
#[derive(Args, Debug, Clone)]
pub struct RevisionArgs {
    /// Revision identifier, exported as PROJECT_REVISION
    #[arg(long)]
    pub revision: String,

    /// Short suffix appended to the upstream version, e.g. a commit hash
    #[arg(long)]
    pub fancy_revision: String,

    /// Source name used for the orig tarball [default: project name]
    #[arg(long)]
    pub vcs_name: Option<String>,

    /// Upstream version [default: project version]
    #[arg(long)]
    pub vcs_version: Option<String>,

    /// Top-level directory of the tarball [default: <vcs-name>-<vcs-version>]
    #[arg(long)]
    pub checkout_dir: Option<String>,
}
