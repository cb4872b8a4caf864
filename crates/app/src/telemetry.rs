//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialise the global tracing subscriber: env-filtered, formatted
/// output. Call once at startup.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vellum_app=debug,vellum_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
