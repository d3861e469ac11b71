use tracing_subscriber::{fmt, EnvFilter};

/// Resolve the log filter: `RUST_LOG` wins over `LOG_LEVEL`, then `default_level`.
pub fn resolve_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Widget logs carry `widget_id` / `handler`
/// fields, so targets stay on to tell engine and transport lines apart.
pub fn init_tracing(default_level: &str) {
    // A subscriber installed earlier (tests, embedding binaries) is kept.
    let _ = fmt()
        .with_env_filter(resolve_filter(default_level))
        .with_target(true)
        .try_init();
}
