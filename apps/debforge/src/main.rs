//! debforge - two-phase Debian package builder
//!
//! This is the CLI application: it loads configuration, assembles the
//! pipeline and routes pipeline events into tracing.

mod cli;
mod error;
mod logging;
mod setup;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::logging::log_event_with_tracing;
use crate::setup::RunSetup;
use clap::Parser;
use debforge_builder::{BuildContext, BuildOrchestrator, BuilderBackend};
use debforge_config::Config;
use debforge_events::{EventReceiver, EventSender};
use debforge_platform::CancellationToken;
use debforge_types::OutputFormat;
use std::future::Future;
use std::process;
use tokio::select;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;
    let debug = cli.global.debug;

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            // Config errors happen before run() installs a subscriber
            init_tracing(json_mode, debug);
            error!("Application error: {}", e);
            if !json_mode {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic; returns the process exit code
async fn run(cli: Cli) -> Result<i32, CliError> {
    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    let json = cli.global.json || config.general.log_format == OutputFormat::Json;
    init_tracing(json, cli.global.debug);
    info!("Starting debforge v{}", env!("CARGO_PKG_VERSION"));

    let (event_sender, event_receiver) = debforge_events::channel();
    let cancel = CancellationToken::new();

    let code = execute_command_with_events(
        execute_command(cli.command, &config, event_sender, cancel.clone(), json),
        event_receiver,
        cancel,
    )
    .await?;

    info!(exit_code = code, "Command completed");
    Ok(code)
}

/// Drive a command while draining its events; Ctrl-C cancels running tools
async fn execute_command_with_events<F>(
    command: F,
    mut event_receiver: EventReceiver,
    cancel: CancellationToken,
) -> Result<i32, CliError>
where
    F: Future<Output = Result<i32, CliError>>,
{
    let mut command_future = Box::pin(command);

    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    log_event_with_tracing(&event);
                }
                return result;
            }

            // Event received
            Some(event) = event_receiver.recv() => {
                log_event_with_tracing(&event);
            }

            Ok(()) = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => {
                warn!("Interrupted, stopping running tools");
                cancel.cancel();
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    config: &Config,
    event_sender: EventSender,
    cancel: CancellationToken,
    json: bool,
) -> Result<i32, CliError> {
    match command {
        Commands::Build {
            target,
            orig,
            revision,
        } => {
            let setup = RunSetup::resolve(config, &target, &revision)?;
            let context = BuildContext::new(&setup.project.name)
                .with_event_sender(event_sender)
                .with_cancellation(cancel);

            let preparer = setup.preparer(&orig, context.clone())?;
            let backend = setup.backend(context.clone())?;
            let mut orchestrator = BuildOrchestrator::new(preparer, Box::new(backend), context);
            Ok(orchestrator.run().await?)
        }

        Commands::Prepare {
            target,
            orig,
            revision,
        } => {
            let setup = RunSetup::resolve(config, &target, &revision)?;
            let context = BuildContext::new(&setup.project.name)
                .with_event_sender(event_sender)
                .with_cancellation(cancel);

            let mut preparer = setup.preparer(&orig, context)?;
            let code = preparer.prepare().await?;
            if let Some(path) = preparer.source_package_path() {
                if json {
                    println!(
                        "{}",
                        serde_json::to_string(&serde_json::json!({
                            "source_package": path,
                            "exit_code": code,
                        }))?
                    );
                } else {
                    println!("{}", path.display());
                }
            }
            Ok(code)
        }

        Commands::ShowCommand {
            target,
            revision,
            dsc,
        } => {
            let setup = RunSetup::resolve(config, &target, &revision)?;
            let context = BuildContext::new(&setup.project.name).with_event_sender(event_sender);

            let dsc = dsc.unwrap_or_else(|| setup.expected_source_package());
            let command = setup.backend(context)?.command(Some(&dsc))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string(&serde_json::json!({
                        "argv": command.argv,
                        "working_dir": command.working_dir,
                    }))?
                );
            } else {
                println!("{}", command.display());
            }
            Ok(0)
        }
    }
}

/// Initialize tracing/logging; returns false when a subscriber is already installed
fn init_tracing(json_mode: bool, debug_enabled: bool) -> bool {
    let default_filter = if debug_enabled {
        "info,debforge=debug,debforge_builder=debug"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let installed = if json_mode {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init()
    };
    installed.is_ok()
}
