//! Listeners that turn a replayed run into output

pub mod events;
pub mod json;
pub mod spec;

pub use events::EventLog;
pub use json::JsonReporter;
pub use spec::SpecReporter;

use serde::{Deserialize, Serialize};

/// Reporter selectable from the command line or config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// Indented human-readable listing with a summary
    #[default]
    Spec,
    /// The run re-serialized in snapshot shape
    Json,
    /// One event name per line
    Events,
}

impl std::fmt::Display for ReporterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spec => write!(f, "spec"),
            Self::Json => write!(f, "json"),
            Self::Events => write!(f, "events"),
        }
    }
}
