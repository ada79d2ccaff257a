// Logging setup: a `tracing` fmt subscriber on stderr, filtered by
// `RUST_LOG` or the level picked on the command line.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `default_level`.
/// Stdout is left to the command result.
pub fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    // Already initialised (e.g. from a test harness); keep the existing one.
    let _ = subscriber.try_init();
}
