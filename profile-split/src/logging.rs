//! Diagnostic tracing for the splitter.
//!
//! Tracing goes to stderr and is controlled by `RUST_LOG`. Plan listings and
//! summaries printed by the CLI go to stdout and are unaffected by it.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, which still reports
/// last-write-wins collisions.
///
/// # Example
/// ```bash
/// RUST_LOG=profile_split=debug profile-split split Admin
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
