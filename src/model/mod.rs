//! In-memory shape of a test run
//!
//! Suites, tests and hooks mirror what a live run holds in memory, so that
//! reporters written against a live run can consume a rebuilt one.

mod hook_replay;
pub mod millis;
mod runnable;
pub mod stats;
mod suite;

pub use hook_replay::HookReplay;
pub use millis::MillisValue;
pub use runnable::{
    ErrorDescriptor, Hook, Outcome, Runnable, RunnableConfig, Speed, Test, TestState,
};
pub use stats::Stats;
pub use suite::{HookType, Hooks, Suite, SuiteConfig, SuiteId, TitlePath};
