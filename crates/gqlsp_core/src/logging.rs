//! Log output setup.

use tracing_subscriber::EnvFilter;

/// Installs the process-wide log subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Output goes to stderr so
/// it never mixes with protocol traffic on stdout. Returns `false` when a
/// subscriber was already installed.
pub fn init_logging(default_level: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
