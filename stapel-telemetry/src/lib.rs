//! # Stapel Telemetry and Monitoring
//!
//! Crate for logging and metrics around the arena toolkit.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
