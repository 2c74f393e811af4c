//! Logging setup for the provider binary and tests.
//!
//! Logs go to **stderr**; stdout is reserved for state output. The filter
//! comes from `RUST_LOG` when set, e.g.:
//!
//! ```bash
//! RUST_LOG=addy_provider=debug addy-provider read addy_api_token_details
//! RUST_LOG=addy_provider::client=trace addy-provider read addy_app_version
//! ```
//!
//! The API key is never recorded: request spans skip the token and
//! [`crate::provider::ProviderData`] redacts it from `Debug` output.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn subscriber(default_level: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(env_filter(default_level)).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    )
}

/// Initialize logging at [`DEFAULT_LOG_LEVEL`].
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default(DEFAULT_LOG_LEVEL);
}

/// Initialize logging, using `default_level` when `RUST_LOG` is not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    subscriber(default_level).init();
}

/// Try to initialize logging, returning false if already initialized.
pub fn try_init_logging() -> bool {
    subscriber(DEFAULT_LOG_LEVEL).try_init().is_ok()
}
