//! Human-readable reporter
//!
//! Prints an indented outline while the run is replayed and a summary with
//! the numbered failures once it ends.

use std::io::Write;

use colored::{Color, Colorize};

use crate::common::{Error, Result};
use crate::model::{ErrorDescriptor, Speed, Stats, Test};
use crate::replay::{Listener, RunEvent};

/// Failure remembered for the summary
struct Failure {
    full_title: String,
    err: ErrorDescriptor,
}

pub struct SpecReporter<W: Write> {
    out: W,
    colors: bool,
    slow_ms: u64,
    indents: usize,
    failures: Vec<Failure>,
    error: Option<Error>,
}

impl<W: Write> SpecReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            colors: true,
            slow_ms: 75,
            indents: 0,
            failures: Vec::new(),
            error: None,
        }
    }

    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub fn slow_ms(mut self, slow_ms: u64) -> Self {
        self.slow_ms = slow_ms;
        self
    }

    /// Hand back the writer, or the error that interrupted writing
    pub fn finish(self) -> Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn paint(&self, text: impl Into<String>, color: Color) -> String {
        let text = text.into();
        if self.colors {
            text.color(color).to_string()
        } else {
            text
        }
    }

    fn dim(&self, text: impl Into<String>) -> String {
        let text = text.into();
        if self.colors {
            text.dimmed().to_string()
        } else {
            text
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.indents.saturating_sub(1))
    }

    /// Recorded speed, else derived from the test's own `slow` or the reporter default
    fn speed_of(&self, test: &Test, ms: f64) -> Speed {
        if let Some(speed) = test.runnable.speed {
            return speed;
        }
        let slow = test.runnable.config.slow().unwrap_or(self.slow_ms) as f64;
        if ms > slow {
            Speed::Slow
        } else if ms > slow / 2.0 {
            Speed::Medium
        } else {
            Speed::Fast
        }
    }

    /// Duration annotation for medium and slow tests
    fn speed_note(&self, test: &Test) -> String {
        let Some(ms) = test.runnable.duration_ms() else {
            return String::new();
        };
        let color = match self.speed_of(test, ms) {
            Speed::Slow => Color::Red,
            Speed::Medium => Color::Yellow,
            Speed::Fast => return String::new(),
        };
        format!(" {}", self.paint(format!("({}ms)", ms.round() as u64), color))
    }

    fn write_event(&mut self, event: &RunEvent<'_>) -> std::io::Result<()> {
        match event {
            RunEvent::RunBegin { .. } => {}
            RunEvent::SuiteBegin(suite) => {
                self.indents += 1;
                let line = format!("{}{}", self.indent(), suite.title);
                writeln!(self.out, "{line}")?;
            }
            RunEvent::SuiteEnd(_) => {
                self.indents = self.indents.saturating_sub(1);
                if self.indents == 1 {
                    writeln!(self.out)?;
                }
            }
            RunEvent::TestPass(test) => {
                let line = format!(
                    "{}  {} {}{}",
                    self.indent(),
                    self.paint("✓", Color::Green),
                    self.dim(test.title()),
                    self.speed_note(test)
                );
                writeln!(self.out, "{line}")?;
            }
            RunEvent::TestFailure(test, err) => {
                self.failures.push(Failure {
                    full_title: test.full_title(),
                    err: (*err).clone(),
                });
                let line = format!(
                    "{}  {}",
                    self.indent(),
                    self.paint(
                        format!("{}) {}", self.failures.len(), test.title()),
                        Color::Red
                    )
                );
                writeln!(self.out, "{line}")?;
            }
            RunEvent::TestPending(test) => {
                let line = format!(
                    "{}  {}",
                    self.indent(),
                    self.paint(format!("- {}", test.title()), Color::Cyan)
                );
                writeln!(self.out, "{line}")?;
            }
            RunEvent::TestEnd(_) => {}
            RunEvent::RunEnd { stats, .. } => self.write_summary(stats)?,
        }
        Ok(())
    }

    fn write_summary(&mut self, stats: &Stats) -> std::io::Result<()> {
        let mut lines = vec![String::new()];
        lines.push(format!(
            "  {} {}",
            self.paint(format!("{} passing", stats.passes), Color::Green),
            self.dim(format!("({})", format_duration(stats.duration)))
        ));
        if stats.failures > 0 {
            lines.push(format!(
                "  {}",
                self.paint(format!("{} failing", stats.failures), Color::Red)
            ));
        }
        if stats.pending > 0 {
            lines.push(format!(
                "  {}",
                self.paint(format!("{} pending", stats.pending), Color::Cyan)
            ));
        }

        for (index, failure) in self.failures.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("  {}) {}:", index + 1, failure.full_title));
            let message = failure.err.message();
            lines.push(format!("     {}", self.paint(message, Color::Red)));
            if let Some(stack) = failure.err.stack() {
                for line in stack
                    .lines()
                    .skip_while(|l| !message.is_empty() && l.contains(message))
                {
                    lines.push(format!("  {}", self.dim(line)));
                }
            }
        }
        lines.push(String::new());

        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

impl<W: Write> Listener for SpecReporter<W> {
    fn on_event(&mut self, event: &RunEvent<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_event(event) {
            tracing::warn!(error = %e, "Failed to write spec report");
            self.error = Some(e.into());
        }
    }
}

/// Short human form of a millisecond count
fn format_duration(ms: u64) -> String {
    match ms {
        0..=999 => format!("{ms}ms"),
        1_000..=59_999 => format!("{}s", ms / 1_000),
        _ => format!("{}m", ms / 60_000),
    }
}
