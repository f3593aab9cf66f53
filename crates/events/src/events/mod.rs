use serde::{Deserialize, Serialize};

pub mod build;
pub mod general;

pub use build::*;
pub use general::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, debug logs)
    General(GeneralEvent),

    /// Packaging pipeline events (phases, external commands, artifacts)
    Build(BuildEvent),
}
