//! Event name recorder

use std::io::Write;

use crate::replay::{EventKind, Listener, RunEvent};

/// Records the kind of every event it receives
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<EventKind>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(|kind| kind.as_str()).collect()
    }

    /// Write one event name per line
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        for kind in &self.events {
            writeln!(out, "{kind}")?;
        }
        out.flush()
    }
}

impl Listener for EventLog {
    fn on_event(&mut self, event: &RunEvent<'_>) {
        self.events.push(event.kind());
    }
}
