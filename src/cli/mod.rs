//! CLI command handling
//!
//! Reads snapshots, drives replays and formats output.

use std::io::{self, Read};
use std::path::Path;

use colored::Colorize;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::model::{HookType, Outcome, Suite};
use crate::replay::{Listener, Replay, RunSummary};
use crate::reporter::{EventLog, JsonReporter, ReporterKind, SpecReporter};
use crate::snapshot;

/// Dispatch a CLI command, returning the process exit code
pub fn dispatch(command: Commands, config_path: Option<&Path>) -> Result<i32> {
    let (config, source) = Config::resolve(config_path)?;
    if !config.reporter.colors {
        colored::control::set_override(false);
    }

    match command {
        Commands::Inspect { input } => {
            let text = read_input(&input)?;
            let root = snapshot::build(text)?;
            print_outline(&root);
            Ok(0)
        }

        Commands::Run {
            input,
            reporter,
            no_stats,
            compact,
        } => {
            let text = read_input(&input)?;
            let kind = reporter.unwrap_or(config.defaults.reporter);
            tracing::debug!(reporter = %kind, input = %input.display(), "Replaying snapshot");

            let summary = match kind {
                ReporterKind::Spec => {
                    let mut reporter = SpecReporter::new(io::stdout().lock())
                        .colors(config.reporter.colors)
                        .slow_ms(config.reporter.slow_ms);
                    let summary = replay_into(&text, &mut reporter)?;
                    reporter.finish()?;
                    summary
                }
                ReporterKind::Json => {
                    let mut reporter = JsonReporter::new(io::stdout().lock())
                        .include_stats(config.reporter.include_stats && !no_stats)
                        .pretty(config.output.pretty && !compact);
                    let summary = replay_into(&text, &mut reporter)?;
                    reporter.finish()?;
                    summary
                }
                ReporterKind::Events => {
                    let mut log = EventLog::new();
                    let summary = replay_into(&text, &mut log)?;
                    log.write_to(io::stdout().lock())?;
                    summary
                }
            };

            Ok(if summary.passed() { 0 } else { 1 })
        }

        Commands::Config => {
            match &source {
                Some(path) if path.exists() => println!("Config file: {}", path.display()),
                Some(path) => println!(
                    "Config file: {} {}",
                    path.display(),
                    "(not found, using defaults)".dimmed()
                ),
                None => println!("Config file: {}", "(no config directory)".dimmed()),
            }
            println!();
            print!("{}", config.to_toml()?);
            Ok(0)
        }
    }
}

/// Read a snapshot from a file, or from stdin for `-`
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })
}

fn replay_into(text: &str, listener: &mut dyn Listener) -> Result<RunSummary> {
    let mut replay = Replay::build(text)?;
    replay.add_listener(listener);
    replay.run()
}

fn print_outline(root: &Suite) {
    let title = if root.title.is_empty() {
        "(root)"
    } else {
        root.title.as_str()
    };
    println!("{}", title.bold());
    print_suite_body(root, 1);

    let (passed, failed, pending) = root.outcome_counts();
    println!();
    println!(
        "{} suites, {} tests: {}, {}, {}",
        root.total_suites(),
        root.total_tests(),
        format!("{passed} passed").green(),
        format!("{failed} failed").red(),
        format!("{pending} pending").cyan()
    );
    if let Some(stats) = &root.stats {
        println!(
            "{}",
            format!(
                "recorded stats: {} passes, {} failures, {} pending in {}ms",
                stats.passes, stats.failures, stats.pending, stats.duration
            )
            .dimmed()
        );
    }
}

fn print_suite_body(suite: &Suite, depth: usize) {
    let pad = "  ".repeat(depth);

    let hooks: Vec<String> = HookType::ALL
        .iter()
        .filter(|t| !suite.hooks.get(**t).is_empty())
        .map(|t| format!("{}×{}", t, suite.hooks.get(*t).len()))
        .collect();
    if !hooks.is_empty() {
        println!("{pad}{}", format!("hooks: {}", hooks.join(", ")).dimmed());
    }

    for test in &suite.tests {
        let marker = match test.outcome() {
            Outcome::Passed => "✓".green(),
            Outcome::Failed(_) => "✗".red(),
            Outcome::Pending => "-".cyan(),
            Outcome::Unresolved => "?".yellow(),
        };
        println!("{pad}{marker} {}", test.title());
    }

    for child in &suite.suites {
        let title = if child.pending {
            format!("{} {}", child.title, "(pending)".dimmed())
        } else {
            child.title.clone()
        };
        println!("{pad}{title}");
        print_suite_body(child, depth + 1);
    }
}
