//! Replay driver
//!
//! Walks a rebuilt tree depth-first and emits the events a live run would
//! have emitted, without running anything.
//!
//! A driver is single use: Idle → Running → Completed (or Aborted when a
//! test resolves to no outcome).

use crate::common::{Error, Result};
use crate::model::{ErrorDescriptor, Outcome, Stats, Suite, Test};
use crate::snapshot::{self, Snapshot};

use super::events::{broadcast, Listener, RunEvent};

/// Lifecycle of a replay driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Completed,
    Aborted,
}

impl std::fmt::Display for DriverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// What a completed replay produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub stats: Stats,
    /// Full titles of failed tests, in replay order
    pub failures: Vec<String>,
}

impl RunSummary {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Replays a rebuilt suite tree to registered listeners
pub struct Replay<'l> {
    root: Suite,
    stats: Stats,
    /// Stats came with the snapshot and must not be recounted
    stats_supplied: bool,
    state: DriverState,
    listeners: Vec<Box<dyn Listener + 'l>>,
}

impl<'l> Replay<'l> {
    /// Build the tree from a snapshot and wrap it in a driver
    pub fn build(input: impl Into<Snapshot>) -> Result<Self> {
        Ok(Self::new(snapshot::build(input)?))
    }

    /// Wrap an already rebuilt tree
    pub fn new(root: Suite) -> Self {
        let (stats, stats_supplied) = match &root.stats {
            Some(stats) => {
                let total = root.total_tests() as u64;
                if stats.tests != total {
                    tracing::warn!(
                        recorded = stats.tests,
                        found = total,
                        "Recorded stats disagree with the snapshot's test count; keeping recorded stats"
                    );
                }
                (stats.clone(), true)
            }
            None => (Stats::zeroed(), false),
        };

        Self {
            root,
            stats,
            stats_supplied,
            state: DriverState::Idle,
            listeners: Vec::new(),
        }
    }

    /// Register a listener; listeners receive events in registration order
    pub fn add_listener(&mut self, listener: impl Listener + 'l) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn root(&self) -> &Suite {
        &self.root
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_supplied(&self) -> bool {
        self.stats_supplied
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Replay the whole tree once
    pub fn run(&mut self) -> Result<RunSummary> {
        self.run_with(|_| {})
    }

    /// Replay the whole tree once, then hand the failed tests to `on_complete`
    #[tracing::instrument(skip_all, fields(root = %self.root.title))]
    pub fn run_with<F>(&mut self, on_complete: F) -> Result<RunSummary>
    where
        F: FnOnce(&[&Test]),
    {
        if self.state != DriverState::Idle {
            return Err(Error::driver_state("run", self.state));
        }
        self.state = DriverState::Running;
        tracing::info!(
            suites = self.root.total_suites(),
            tests = self.root.total_tests(),
            recorded_stats = self.stats_supplied,
            "Replay started"
        );

        let mut walk = Walk {
            listeners: &mut self.listeners,
            stats: &mut self.stats,
            recount: !self.stats_supplied,
            failures: Vec::new(),
        };

        broadcast(walk.listeners, RunEvent::RunBegin { root: &self.root });

        if let Err(e) = walk.suite(&self.root) {
            tracing::warn!(error = %e, "Replay aborted");
            self.state = DriverState::Aborted;
            return Err(e);
        }

        broadcast(
            walk.listeners,
            RunEvent::RunEnd {
                root: &self.root,
                stats: walk.stats,
            },
        );

        on_complete(&walk.failures);

        let summary = RunSummary {
            stats: walk.stats.clone(),
            failures: walk.failures.iter().map(|t| t.full_title()).collect(),
        };
        self.state = DriverState::Completed;

        tracing::info!(
            passes = summary.stats.passes,
            failures = summary.stats.failures,
            pending = summary.stats.pending,
            "Replay finished"
        );

        Ok(summary)
    }
}

/// Mutable state of one walk over the tree
struct Walk<'a, 'l> {
    listeners: &'a mut Vec<Box<dyn Listener + 'l>>,
    stats: &'a mut Stats,
    recount: bool,
    failures: Vec<&'a Test>,
}

impl<'a> Walk<'a, '_> {
    fn suite(&mut self, suite: &'a Suite) -> Result<()> {
        broadcast(self.listeners, RunEvent::SuiteBegin(suite));

        for test in &suite.tests {
            self.test(test)?;
        }
        for child in &suite.suites {
            self.suite(child)?;
        }

        if self.recount {
            self.stats.suites += 1;
        }
        broadcast(self.listeners, RunEvent::SuiteEnd(suite));
        Ok(())
    }

    fn test(&mut self, test: &'a Test) -> Result<()> {
        match test.outcome() {
            Outcome::Passed => {
                broadcast(self.listeners, RunEvent::TestPass(test));
                if self.recount {
                    self.stats.passes += 1;
                }
            }
            Outcome::Failed(err) => self.fail(test, err),
            Outcome::Pending => {
                broadcast(self.listeners, RunEvent::TestPending(test));
                if self.recount {
                    self.stats.pending += 1;
                }
            }
            Outcome::Unresolved => return Err(Error::unexpected_state(&test.full_title())),
        }

        broadcast(self.listeners, RunEvent::TestEnd(test));
        if self.recount {
            self.stats.tests += 1;
        }
        Ok(())
    }

    /// Register a failure the way a live run does, then report it
    fn fail(&mut self, test: &'a Test, err: &'a ErrorDescriptor) {
        self.failures.push(test);
        broadcast(self.listeners, RunEvent::TestFailure(test, err));
        if self.recount {
            self.stats.failures += 1;
        }
    }
}
