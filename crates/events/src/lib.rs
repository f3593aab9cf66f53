#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in debforge
//!
//! Library crates never print or log directly. They emit domain events through
//! an optional [`EventSender`]; the CLI drains the channel and turns events into
//! `tracing` records.

pub mod events;
pub use events::{AppEvent, BuildEvent, BuildPhase, GeneralEvent};

use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Type alias for event sender using the `AppEvent` system
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver using the `AppEvent` system
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout debforge
///
/// Implemented by anything that may carry an [`EventSender`]; emission is a
/// no-op when no sender is attached.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a debug log event with context
    fn emit_debug_with_context(
        &self,
        message: impl Into<String>,
        context: std::collections::HashMap<String, String>,
    ) {
        self.emit(AppEvent::General(GeneralEvent::debug_with_context(
            message, context,
        )));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit a phase started event
    fn emit_phase_started(
        &self,
        session_id: impl Into<String>,
        package: impl Into<String>,
        phase: BuildPhase,
    ) {
        self.emit(AppEvent::Build(BuildEvent::PhaseStarted {
            session_id: session_id.into(),
            package: package.into(),
            phase,
        }));
    }

    /// Emit a phase completed event
    fn emit_phase_completed(
        &self,
        session_id: impl Into<String>,
        package: impl Into<String>,
        phase: BuildPhase,
        exit_code: i32,
        duration: Duration,
    ) {
        self.emit(AppEvent::Build(BuildEvent::PhaseCompleted {
            session_id: session_id.into(),
            package: package.into(),
            phase,
            exit_code,
            duration,
        }));
    }

    /// Emit a phase failed event
    fn emit_phase_failed(
        &self,
        session_id: impl Into<String>,
        package: impl Into<String>,
        phase: BuildPhase,
        error: impl Into<String>,
    ) {
        self.emit(AppEvent::Build(BuildEvent::PhaseFailed {
            session_id: session_id.into(),
            package: package.into(),
            phase,
            error: error.into(),
        }));
    }

    /// Emit a command started event
    fn emit_command_started(
        &self,
        package: impl Into<String>,
        command: impl Into<String>,
        working_dir: PathBuf,
    ) {
        self.emit(AppEvent::Build(BuildEvent::CommandStarted {
            package: package.into(),
            command: command.into(),
            working_dir,
        }));
    }

    /// Emit a command completed event
    fn emit_command_completed(
        &self,
        package: impl Into<String>,
        command: impl Into<String>,
        exit_code: Option<i32>,
        duration: Duration,
    ) {
        self.emit(AppEvent::Build(BuildEvent::CommandCompleted {
            package: package.into(),
            command: command.into(),
            exit_code,
            duration,
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
