//! Custom validation functions shared across configuration modules.

use validator::ValidationError;

/// The arena buffer's base alignment; capacities are provisioned in
/// whole multiples of it.
const BUFFER_BASE_ALIGN: usize = 16;

/// Validate that a capacity is a whole multiple of the buffer base
/// alignment.
pub fn validate_capacity_granularity(value: usize) -> Result<(), ValidationError> {
    if value % BUFFER_BASE_ALIGN == 0 {
        Ok(())
    } else {
        Err(ValidationError::new("must_be_multiple_of_base_alignment"))
    }
}

/// Validate a tracing level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new("^(trace|debug|info|warn|error)$")
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(&level.to_lowercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}
