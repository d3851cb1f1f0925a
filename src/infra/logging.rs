//! Diagnostic logging. User-facing progress is printed directly; this only
//! covers the `tracing` events emitted while the matrix runs.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber writing to stderr.
///
/// `RUST_LOG` wins when set. Otherwise this crate logs at `warn`, or at
/// `debug` with `verbose`. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sysroot_matrix={level}")));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();
}
