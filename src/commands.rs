//! CLI command definitions
//!
//! Defines the clap commands for the suite-replay CLI.

use clap::Subcommand;
use std::path::PathBuf;

use crate::reporter::ReporterKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild a snapshot and print its outline without replaying it
    Inspect {
        /// Snapshot file, or `-` for stdin
        input: PathBuf,
    },

    /// Replay a snapshot through a reporter
    ///
    /// Exits with status 1 when any failure was replayed.
    Run {
        /// Snapshot file, or `-` for stdin
        input: PathBuf,

        /// Reporter to use (default from config, else spec)
        #[arg(long, short, value_enum)]
        reporter: Option<ReporterKind>,

        /// Leave the stats block out of JSON output
        #[arg(long)]
        no_stats: bool,

        /// Write JSON output on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Show the effective configuration
    Config,
}
