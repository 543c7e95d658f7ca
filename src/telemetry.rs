//! Telemetry and Observability
//!
//! Sets up the `tracing-subscriber` pipeline: env-filter driven levels,
//! pretty terminal output in debug builds, JSON structured output in
//! release builds so logs feed straight into aggregation tooling.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with the config-driven log level.
///
/// A `RUST_LOG` environment variable takes precedence over `log_level`.
/// Calling this more than once is harmless; later calls are no-ops.
pub fn init_telemetry_with_level(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},maestro={level}", level = log_level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    if cfg!(debug_assertions) {
        registry
            .with(fmt::layer().pretty().with_target(false))
            .try_init()
            .ok();
    } else {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
            .ok();
    }
}

/// Initialize tracing at the "info" level, for use before config is loaded.
pub fn init_telemetry() {
    init_telemetry_with_level("info");
}
