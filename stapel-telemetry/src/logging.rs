//! ## stapel-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! One subscriber for the whole process: compact fmt output, level
//! picked from `RUST_LOG` with a configurable fallback. Allocation hot
//! paths stay silent; only cold paths (rejections, resets) emit events.

use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber with an `info` fallback level.
    pub fn init() {
        Self::init_with_level("info");
    }

    /// Installs the global subscriber, honoring `RUST_LOG` when set and
    /// falling back to `default_level` otherwise.
    pub fn init_with_level(default_level: &str) {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_level.to_string())),
            )
            .with_thread_names(true)
            .init()
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn emits_structured_events() {
        tracing::info!(capacity = 64, "arena provisioned");
        assert!(logs_contain("arena provisioned"));
    }
}
