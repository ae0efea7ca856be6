//! Tracing and logging setup shared by binaries and tests.

/// Initialize process-wide observability (tracing/logging) from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Logging configuration (filter directive, output format).
pub mod config;

/// Tracing subscriber installation.
pub mod tracing;

pub use config::{LogConfig, LogFormat, UnknownLogFormat};
pub use self::tracing::init_with;
