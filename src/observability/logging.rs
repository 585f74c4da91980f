//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Respect RUST_LOG over the configured default level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: env-filter (RUST_LOG wins) + fmt layer.
///
/// `default_level` comes from the observability config and applies to this
/// crate's events when the environment has no opinion.
pub fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(format!("task_router={}", default_level))
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
