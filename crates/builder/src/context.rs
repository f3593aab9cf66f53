//! Build context shared by the pipeline phases

use debforge_events::{EventEmitter, EventSender};
use debforge_platform::CancellationToken;

/// Per-run context: event routing, cancellation, and a session id tying
/// the phase events of one run together
#[derive(Clone, Debug)]
pub struct BuildContext {
    /// Identifier carried by every phase event of this run
    pub session_id: String,
    /// Package name used in events
    pub package: String,
    /// Event sender for progress reporting
    pub event_sender: Option<EventSender>,
    /// Cancels every external tool started by this run
    pub cancel: CancellationToken,
}

impl EventEmitter for BuildContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl BuildContext {
    /// Create new build context
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            package: package.into(),
            event_sender: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, event_sender: EventSender) -> Self {
        self.event_sender = Some(event_sender);
        self
    }

    /// Use an externally owned cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
