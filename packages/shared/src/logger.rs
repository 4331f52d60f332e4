//! Logging setup utilities for the mitsudan binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose log output is enabled by default.
const LOG_TARGETS: [&str; 3] = ["mitsudan_server", "mitsudan_client", "mitsudan_shared"];

/// Initialize the tracing subscriber with the specified default log level.
///
/// Enables output for the workspace crates and the calling binary. The filter
/// can be overridden entirely through the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "server", "client")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use mitsudan_shared::logger::setup_logger;
///
/// setup_logger("server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                let mut directives: Vec<String> = LOG_TARGETS
                    .iter()
                    .map(|target| format!("{}={}", target, default_level))
                    .collect();
                directives.push(format!(
                    "{}={}",
                    binary_name.replace('-', "_"),
                    default_level
                ));
                directives.join(",").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
