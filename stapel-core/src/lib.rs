//! # stapel-core
//!
//! Fixed-capacity bump arena for short-lived, same-lifetime values.
//! Built with determinism, predictability, and zero fragmentation as
//! primary design constraints.
//!
//! ### Expectations (Production):
//! - O(1) allocation: one padding computation, one bounds check, one
//!   cursor advance
//! - No general-purpose heap traffic after construction
//! - Bulk-only reclamation via `reset`; no per-value teardown
//!
//! ### Key Submodules:
//! - `arena`: the allocation core (placement, capacity accounting,
//!   in-place construction, reset)
//! - `ledger`: per-allocation records behind the `ledger` cargo feature
//! - `report`: memory map and usage-bar renderers
//! - `stats`: occupancy snapshots for telemetry

pub mod arena;
pub mod error;
pub mod ledger;
pub mod report;
pub mod stats;

pub mod prelude {
    pub use crate::arena::{Arena, MAX_ALIGN};
    pub use crate::error::ArenaError;
    pub use crate::ledger::AllocationRecord;
    pub use crate::stats::ArenaStats;
}

pub use arena::Arena;
pub use error::ArenaError;
