//! ## stapel-core::stats
//! **Occupancy and lifetime counters**

use serde::Serialize;

use crate::arena::Arena;

/// Point-in-time snapshot of arena occupancy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArenaStats {
    pub capacity: usize,
    pub used: usize,
    pub remaining: usize,
    /// `used / capacity`, in `0.0..=1.0`.
    pub utilization: f64,
    pub allocations: usize,
    pub failed_allocations: usize,
    pub generation: u64,
}

impl Arena {
    /// Captures the current occupancy and the lifetime counters.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            capacity: self.capacity(),
            used: self.used(),
            remaining: self.remaining(),
            utilization: self.used() as f64 / self.capacity() as f64,
            allocations: self.allocation_count(),
            failed_allocations: self.failure_count(),
            generation: self.generation(),
        }
    }
}
