//! Replaying a rebuilt tree as a run event stream

mod driver;
pub mod events;

pub use driver::{DriverState, Replay, RunSummary};
pub use events::{EventKind, Listener, RunEvent};
