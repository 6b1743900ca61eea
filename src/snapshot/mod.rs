//! Serialized runs: the JSON shape and the tree builder

mod builder;
pub mod source;

pub use builder::{build, parse_suite, parse_test, Snapshot};
pub use source::{HookNode, RunnableNode, SnapshotDocument, SuiteNode};
