//! Tracing setup for the CLI.

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "conjure=warn";
const VERBOSE_LOG_FILTER: &str = "conjure=debug";

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
