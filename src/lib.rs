//! Suite replay - rebuild serialized test runs and replay them
//!
//! A snapshot is the JSON a serializing reporter wrote for a finished run.
//! [`snapshot::build`] turns it back into a suite tree and [`Replay`] walks
//! that tree, emitting the events a live run would have emitted so that
//! reporters can consume them unchanged.

pub mod cli;
pub mod commands;
pub mod common;
pub mod model;
pub mod replay;
pub mod reporter;
pub mod snapshot;

// Re-export commonly used types for tests
pub use common::{Error, ErrorKind, Result};
pub use model::{Hook, Outcome, Stats, Suite, Test};
pub use replay::{DriverState, EventKind, Listener, Replay, RunEvent, RunSummary};
pub use snapshot::{build, Snapshot};
