use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,marex=debug";

/// Initialize logging/tracing.
/// - JSON logs, one object per line
/// - RUST_LOG respected; default to "info,marex=debug"
pub fn init(service_name: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!(service = %service_name, "Observability initialized");
}
