//! Run events and the listener contract
//!
//! Events are broadcast synchronously to every listener, in registration
//! order, from inside the emitting call.

use crate::model::{ErrorDescriptor, Stats, Suite, Test};

/// An event of a (replayed) run
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    RunBegin { root: &'a Suite },
    SuiteBegin(&'a Suite),
    TestPass(&'a Test),
    TestFailure(&'a Test, &'a ErrorDescriptor),
    TestPending(&'a Test),
    TestEnd(&'a Test),
    SuiteEnd(&'a Suite),
    RunEnd { root: &'a Suite, stats: &'a Stats },
}

impl RunEvent<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::RunBegin { .. } => EventKind::RunBegin,
            Self::SuiteBegin(_) => EventKind::SuiteBegin,
            Self::TestPass(_) => EventKind::TestPass,
            Self::TestFailure(..) => EventKind::TestFailure,
            Self::TestPending(_) => EventKind::TestPending,
            Self::TestEnd(_) => EventKind::TestEnd,
            Self::SuiteEnd(_) => EventKind::SuiteEnd,
            Self::RunEnd { .. } => EventKind::RunEnd,
        }
    }
}

/// Payload-free event tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RunBegin,
    SuiteBegin,
    TestPass,
    TestFailure,
    TestPending,
    TestEnd,
    SuiteEnd,
    RunEnd,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RunBegin => "run-begin",
            Self::SuiteBegin => "suite-begin",
            Self::TestPass => "test-pass",
            Self::TestFailure => "test-failure",
            Self::TestPending => "test-pending",
            Self::TestEnd => "test-end",
            Self::SuiteEnd => "suite-end",
            Self::RunEnd => "run-end",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer of run events (a reporter, a recorder, ...)
pub trait Listener {
    fn on_event(&mut self, event: &RunEvent<'_>);
}

impl<L: Listener + ?Sized> Listener for &mut L {
    fn on_event(&mut self, event: &RunEvent<'_>) {
        (**self).on_event(event)
    }
}

/// Deliver one event to every listener in order
pub(crate) fn broadcast(listeners: &mut [Box<dyn Listener + '_>], event: RunEvent<'_>) {
    tracing::trace!(event = %event.kind(), "Emitting");
    for listener in listeners.iter_mut() {
        listener.on_event(&event);
    }
}
