//! # Stapel Configuration System
//!
//! Hierarchical configuration for the arena toolkit: defaults, YAML
//! files, and environment variables merged in that order, validated
//! before anything downstream sees the values.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod arena;
mod error;
mod report;
mod telemetry;
mod validation;

pub use arena::ArenaConfig;
pub use error::ConfigError;
pub use report::ReportConfig;
pub use telemetry::TelemetryConfig;

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct StapelConfig {
    /// Arena sizing.
    #[validate(nested)]
    pub arena: ArenaConfig,

    /// Report rendering parameters.
    #[validate(nested)]
    pub report: ReportConfig,

    /// Logging configuration.
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl StapelConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/stapel.yaml` - base settings, skipped when missing
    /// 3. `config/<environment>.yaml` - `STAPEL_ENV` overrides
    /// 4. `STAPEL_*` environment variables (`__` separates nesting)
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(StapelConfig::default()));

        if Path::new("config/stapel.yaml").exists() {
            figment = figment.merge(Yaml::file("config/stapel.yaml"));
        } else {
            tracing::debug!("config/stapel.yaml not found, using default configuration");
        }

        let env = std::env::var("STAPEL_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        figment
            .merge(Env::prefixed("STAPEL_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path, for tests and one-off
    /// runs.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Figment::from(Serialized::defaults(StapelConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("STAPEL_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
