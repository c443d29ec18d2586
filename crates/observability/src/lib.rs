//! Logging setup shared by gstdesk binaries.

/// Initialize process-wide logging from the environment.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(&ObservabilityConfig::from_env());
}

/// Environment-driven settings (`GSTDESK_LOG_FORMAT`, `RUST_LOG`).
pub mod config;

/// Subscriber construction (filters, output format).
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig, UnknownLogFormat};
