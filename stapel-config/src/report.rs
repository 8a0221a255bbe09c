//! Report rendering parameters.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Usage-bar rendering configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ReportConfig {
    /// Width of the usage bar in columns.
    #[serde(default = "default_bar_width")]
    #[validate(range(min = 8, max = 120))]
    pub bar_width: usize,
}

fn default_bar_width() -> usize {
    20
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
        }
    }
}
