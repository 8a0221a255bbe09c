use thiserror::Error;

/// Allocation failure conditions.
///
/// Exhaustion is the only way an allocation can fail: alignment is
/// always satisfiable by construction of the placement math, and bounds
/// are enforced by the capacity check itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error(
        "arena out of capacity: {requested} bytes (align {align}) requested, {remaining} remaining"
    )]
    OutOfCapacity {
        requested: usize,
        align: usize,
        remaining: usize,
    },
}
