//! Serializing reporter
//!
//! Writes the replayed tree back out in the same shape the builder reads,
//! so a snapshot can be rebuilt, replayed and written again without loss.

use std::io::Write;

use crate::common::{Error, Result};
use crate::replay::{Listener, RunEvent};
use crate::snapshot::{SnapshotDocument, SuiteNode};

/// Writes `{"suite": ..., "stats": ...}` when the run ends
pub struct JsonReporter<W: Write> {
    out: W,
    include_stats: bool,
    pretty: bool,
    /// First write failure; listeners cannot return errors
    error: Option<Error>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            include_stats: true,
            pretty: true,
            error: None,
        }
    }

    pub fn include_stats(mut self, include: bool) -> Self {
        self.include_stats = include;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Hand back the writer, or the error that interrupted writing
    pub fn finish(self) -> Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn write_document(&mut self, document: &SnapshotDocument<'_>) -> Result<()> {
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, document)
        } else {
            serde_json::to_writer(&mut self.out, document)
        };
        written.map_err(std::io::Error::from)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Listener for JsonReporter<W> {
    fn on_event(&mut self, event: &RunEvent<'_>) {
        let RunEvent::RunEnd { root, stats } = event else {
            return;
        };

        let document = SnapshotDocument {
            suite: SuiteNode::from_suite(root),
            stats: self.include_stats.then_some(*stats),
        };

        if let Err(e) = self.write_document(&document) {
            tracing::warn!(error = %e, "Failed to write JSON report");
            self.error.get_or_insert(e);
        }
    }
}
