//! Diagnostic logging
//!
//! Progress banners and the summary go to stdout. Tracing events go to
//! stderr so they never interleave with the report a user is reading.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "dares_runner=debug,warn"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`. Returns `false` if a
/// subscriber was already installed.
pub fn init(verbose: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .is_ok()
}
