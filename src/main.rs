//! suite-replay - rebuild and replay serialized test runs
//!
//! Reads a snapshot written by a serializing reporter, rebuilds the suite
//! tree and replays the recorded outcomes through a reporter.

use clap::Parser;
use replay::commands::Commands;
use replay::common::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "suite-replay", about = "Replay serialized test runs")]
#[command(version, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use this configuration file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.verbose);

    match replay::cli::dispatch(cli.command, cli.config.as_deref()) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.kind().exit_code());
        }
    }
}
