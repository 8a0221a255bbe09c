//! Arena sizing parameters.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Arena sizing configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ArenaConfig {
    /// Backing buffer size in bytes. Must be a multiple of the buffer
    /// base alignment (16) so the tail region stays serviceable for any
    /// natural alignment.
    #[serde(default = "default_capacity_bytes")]
    #[validate(range(min = 64, max = 1_073_741_824))]
    #[validate(custom(function = validation::validate_capacity_granularity))]
    pub capacity_bytes: usize,
}

fn default_capacity_bytes() -> usize {
    65536
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: default_capacity_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unaligned_capacity() {
        let config = ArenaConfig {
            capacity_bytes: 1000,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_tiny_capacity() {
        let config = ArenaConfig { capacity_bytes: 16 };
        assert!(config.validate().is_err());
    }
}
