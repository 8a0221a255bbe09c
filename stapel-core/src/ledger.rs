//! ## stapel-core::ledger
//! **Chronological allocation records behind the `ledger` feature**
//!
//! The recording implementation is compiled in only when the `ledger`
//! cargo feature is on; release builds get a zero-sized stub with the
//! same API, so the allocation path carries no extra cost and no
//! runtime branch. Records are purely descriptive; placement decisions
//! never consult them.

use serde::Serialize;

/// One allocation as the arena placed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationRecord {
    /// Byte offset of the value inside the buffer.
    pub offset: usize,
    /// Value size in bytes, padding not included.
    pub size: usize,
    /// Diagnostic type label (`core::any::type_name`), `<raw>` for
    /// layout-level reservations.
    pub type_tag: &'static str,
}

#[cfg(feature = "ledger")]
mod imp {
    use std::cell::RefCell;

    use super::AllocationRecord;

    /// Append-only recorder, cleared on arena reset.
    #[derive(Debug, Default)]
    pub struct Ledger {
        entries: RefCell<Vec<AllocationRecord>>,
    }

    impl Ledger {
        pub const ENABLED: bool = true;

        pub fn new() -> Self {
            Self {
                entries: RefCell::new(Vec::with_capacity(128)),
            }
        }

        pub fn record(&self, record: AllocationRecord) {
            self.entries.borrow_mut().push(record);
        }

        pub fn clear(&self) {
            self.entries.borrow_mut().clear();
        }

        pub fn len(&self) -> usize {
            self.entries.borrow().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Copies the records out in chronological order.
        pub fn snapshot(&self) -> Vec<AllocationRecord> {
            self.entries.borrow().clone()
        }
    }
}

#[cfg(not(feature = "ledger"))]
mod imp {
    use super::AllocationRecord;

    /// No-op stand-in compiled when the `ledger` feature is off.
    #[derive(Debug, Default)]
    pub struct Ledger;

    impl Ledger {
        pub const ENABLED: bool = false;

        pub fn new() -> Self {
            Ledger
        }

        #[inline(always)]
        pub fn record(&self, _record: AllocationRecord) {}

        #[inline(always)]
        pub fn clear(&self) {}

        pub fn len(&self) -> usize {
            0
        }

        pub fn is_empty(&self) -> bool {
            true
        }

        pub fn snapshot(&self) -> Vec<AllocationRecord> {
            Vec::new()
        }
    }
}

pub use imp::Ledger;


#[cfg(all(test, not(feature = "ledger")))]
mod tests {
    use super::*;

    #[test]
    fn stub_discards_everything() {
        let ledger = Ledger::new();
        ledger.record(AllocationRecord {
            offset: 0,
            size: 4,
            type_tag: "test",
        });
        assert!(ledger.is_empty());
        assert!(ledger.snapshot().is_empty());
        assert!(!Ledger::ENABLED);
    }
}
