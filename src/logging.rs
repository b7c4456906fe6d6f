//! Log setup for the command-line tool.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr.
///
/// The level is `info`, or `debug` with `verbose`. `RUST_LOG` overrides the
/// filter only in verbose mode. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("placard=debug"))
    } else {
        EnvFilter::new("placard=info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
