//! Logging and tracing configuration
//!
//! Diagnostics always go to stderr so stdout carries only reporter output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a given `-v` count
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "replay=warn,suite_replay=warn,warn",
        1 => "replay=info,suite_replay=info,warn",
        2 => "replay=debug,suite_replay=debug,warn",
        _ => "replay=trace,suite_replay=trace,info",
    }
}

/// Initialize tracing for the CLI (stderr logging)
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count.
pub fn init_cli(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
