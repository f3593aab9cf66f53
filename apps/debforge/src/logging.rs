//! Structured logging integration for events
//!
//! Library crates only emit [`AppEvent`]s. This module turns them into
//! tracing records with structured fields.

use debforge_events::{AppEvent, BuildEvent, GeneralEvent};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    match event {
        AppEvent::General(general) => log_general(general),
        AppEvent::Build(build) => log_build(build),
    }
}

fn log_general(event: &GeneralEvent) {
    match event {
        GeneralEvent::Warning { message, context } => {
            warn!(context = ?context, "{message}");
        }
        GeneralEvent::DebugLog { message, context } => {
            if context.is_empty() {
                debug!("{message}");
            } else {
                debug!(context = ?context, "{message}");
            }
        }
    }
}

fn log_build(event: &BuildEvent) {
    match event {
        BuildEvent::PhaseStarted {
            session_id,
            package,
            phase,
        } => {
            info!(
                session = %session_id,
                package = %package,
                phase = %phase,
                "Phase started"
            );
        }
        BuildEvent::PhaseCompleted {
            session_id,
            package,
            phase,
            exit_code,
            duration,
        } => {
            if *exit_code == 0 {
                info!(
                    session = %session_id,
                    package = %package,
                    phase = %phase,
                    duration_ms = millis(*duration),
                    "Phase completed"
                );
            } else {
                warn!(
                    session = %session_id,
                    package = %package,
                    phase = %phase,
                    exit_code = exit_code,
                    duration_ms = millis(*duration),
                    "Phase finished with non-zero exit code"
                );
            }
        }
        BuildEvent::PhaseFailed {
            session_id,
            package,
            phase,
            error,
        } => {
            error!(
                session = %session_id,
                package = %package,
                phase = %phase,
                error = %error,
                "Phase failed"
            );
        }
        BuildEvent::SourcesExtracted {
            package,
            archive,
            destination,
        } => {
            info!(
                package = %package,
                archive = %archive.display(),
                destination = %destination.display(),
                "Sources extracted"
            );
        }
        BuildEvent::ChangelogUpdated {
            package,
            version,
            distribution,
        } => {
            info!(
                package = %package,
                version = %version,
                distribution = %distribution,
                "Changelog updated"
            );
        }
        BuildEvent::SourcePackageReady { package, path } => {
            info!(
                package = %package,
                path = %path.display(),
                "Source package ready"
            );
        }
        BuildEvent::CommandStarted {
            package,
            command,
            working_dir,
        } => {
            info!(
                package = %package,
                command = %command,
                working_dir = %working_dir.display(),
                "Command started"
            );
        }
        BuildEvent::CommandCompleted {
            package,
            command,
            exit_code,
            duration,
        } => {
            debug!(
                package = %package,
                command = %command,
                exit_code = ?exit_code,
                duration_ms = millis(*duration),
                "Command completed"
            );
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
