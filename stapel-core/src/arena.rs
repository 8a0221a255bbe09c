//! ## stapel-core::arena
//! **Fixed-capacity bump arena**
//!
//! One max-aligned byte buffer served by advancing a single cursor.
//! Placement is recomputed per call from the live cursor address, so
//! heterogeneous types pack back-to-back with minimal padding.
//!
//! ### Expectations (Production):
//! - O(1) allocation and reset, no locks, no syscalls after construction
//! - `used` never exceeds `capacity`, including transiently on failure
//! - References stay valid until `reset`, which takes `&mut self`
//!
//! Reclamation is bulk-only: `reset` rewinds the cursor without running
//! destructors, so values that own resources must be torn down by the
//! caller first.

use std::alloc::{self, Layout};
use std::any;
use std::cell::Cell;
use std::ptr::NonNull;

use crate::error::ArenaError;
use crate::ledger::{AllocationRecord, Ledger};

/// Base alignment of the backing buffer. Every allocation with natural
/// alignment up to this value lands at a buffer-relative offset that is
/// independent of where the buffer happens to sit in memory.
pub const MAX_ALIGN: usize = 16;

/// Bump arena over a fixed, exclusively owned buffer.
///
/// `allocate` hands out `&mut` references that borrow the arena, so the
/// borrow checker pins the arena in place while any allocation is live
/// and forces all of them to be dead before [`Arena::reset`] can run.
/// The arena is neither `Clone` nor `Sync`; the cursor is a plain
/// [`Cell`] with no atomicity guarantee.
pub struct Arena {
    base: NonNull<u8>,
    capacity: usize,
    used: Cell<usize>,
    allocations: Cell<usize>,
    failures: Cell<usize>,
    generation: Cell<u64>,
    ledger: Ledger,
}

// SAFETY: the arena exclusively owns its buffer and all interior state
// moves with it; nothing ties it to the creating thread.
unsafe impl Send for Arena {}

impl Arena {
    /// Creates an arena backed by a freshly allocated `capacity`-byte
    /// buffer aligned to [`MAX_ALIGN`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Aborts via
    /// [`std::alloc::handle_alloc_error`] if the buffer cannot be
    /// obtained.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "arena capacity must be greater than zero");
        let layout = Layout::from_size_align(capacity, MAX_ALIGN)
            .expect("arena capacity exceeds the maximum layout size");

        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let base = match NonNull::new(raw) {
            Some(base) => base,
            None => alloc::handle_alloc_error(layout),
        };

        Self {
            base,
            capacity,
            used: Cell::new(0),
            allocations: Cell::new(0),
            failures: Cell::new(0),
            generation: Cell::new(0),
            ledger: Ledger::new(),
        }
    }

    /// Moves `value` into the arena and returns a reference valid for
    /// the current generation.
    ///
    /// Returns `None` when the padded request does not fit the remaining
    /// space; the cursor is left untouched in that case. The value's
    /// destructor will never run: storage is reclaimed wholesale by
    /// [`Arena::reset`] or when the arena is dropped.
    #[inline]
    pub fn allocate<T>(&self, value: T) -> Option<&mut T> {
        self.allocate_with(move || value)
    }

    /// Like [`Arena::allocate`], but constructs the value directly in
    /// its slot. `init` runs exactly once, after the slot has been
    /// reserved; it is the only point where caller code executes.
    #[inline]
    pub fn allocate_with<T, F>(&self, init: F) -> Option<&mut T>
    where
        F: FnOnce() -> T,
    {
        self.try_allocate_with(init).ok()
    }

    /// Fallible form of [`Arena::allocate_with`] for callers that want
    /// the rejected size/alignment in the error.
    pub fn try_allocate_with<T, F>(&self, init: F) -> Result<&mut T, ArenaError>
    where
        F: FnOnce() -> T,
    {
        let layout = Layout::new::<T>();
        let offset = self.bump(layout)?;
        self.ledger.record(AllocationRecord {
            offset,
            size: layout.size(),
            type_tag: any::type_name::<T>(),
        });

        // SAFETY: `bump` reserved `layout.size()` bytes at `offset`
        // inside the buffer, aligned for `T`, and no other live
        // reference covers them within this generation.
        unsafe {
            let slot = self.base.as_ptr().add(offset) as *mut T;
            slot.write(init());
            Ok(&mut *slot)
        }
    }

    /// Reserves uninitialized storage for an arbitrary layout.
    ///
    /// The pointer is valid for `layout.size()` bytes until the next
    /// [`Arena::reset`]. The ledger tags such regions as `<raw>`.
    pub fn try_alloc_layout(&self, layout: Layout) -> Result<NonNull<u8>, ArenaError> {
        let offset = self.bump(layout)?;
        self.ledger.record(AllocationRecord {
            offset,
            size: layout.size(),
            type_tag: "<raw>",
        });

        // SAFETY: `offset` is in bounds of the owned buffer.
        unsafe { Ok(NonNull::new_unchecked(self.base.as_ptr().add(offset))) }
    }

    /// Computes the aligned placement for `layout` and advances the
    /// cursor, or rejects the request leaving the cursor untouched.
    fn bump(&self, layout: Layout) -> Result<usize, ArenaError> {
        let align = layout.align();
        let used = self.used.get();
        let addr = self.base.as_ptr() as usize + used;
        let padding = (align - (addr % align)) % align;

        // Check before any cursor mutation: a rejected request must be
        // invisible to later allocations.
        if used + padding + layout.size() > self.capacity {
            self.failures.set(self.failures.get() + 1);
            let err = ArenaError::OutOfCapacity {
                requested: layout.size(),
                align,
                remaining: self.capacity - used,
            };
            tracing::trace!(
                requested = layout.size(),
                align,
                used,
                capacity = self.capacity,
                "allocation rejected"
            );
            return Err(err);
        }

        let offset = used + padding;
        self.used.set(offset + layout.size());
        self.allocations.set(self.allocations.get() + 1);
        Ok(offset)
    }

    /// Rewinds the cursor to zero, starting a new generation.
    ///
    /// Requires `&mut self`, so every reference handed out by the
    /// allocation methods must be dead before this compiles. No
    /// destructors run; previously allocated storage is simply reused.
    pub fn reset(&mut self) {
        self.used.set(0);
        self.generation.set(self.generation.get() + 1);
        self.ledger.clear();
        tracing::debug!(generation = self.generation.get(), "arena reset");
    }

    /// Total buffer size in bytes, fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed so far in this generation, padding included.
    #[inline]
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Bytes still available before the next rejection.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.used.get()
    }

    /// Successful allocations across the arena's lifetime.
    #[inline]
    pub fn allocation_count(&self) -> usize {
        self.allocations.get()
    }

    /// Rejected allocations across the arena's lifetime.
    #[inline]
    pub fn failure_count(&self) -> usize {
        self.failures.get()
    }

    /// Completed resets; references are only valid within the
    /// generation that issued them.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub(crate) fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        // SAFETY: same size/align pair that was validated and allocated
        // in `with_capacity`; no payload destructors run here.
        unsafe {
            let layout = Layout::from_size_align_unchecked(self.capacity, MAX_ALIGN);
            alloc::dealloc(self.base.as_ptr(), layout);
        }
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("used", &self.used.get())
            .field("generation", &self.generation.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset_in(arena: &Arena, addr: usize) -> usize {
        addr - arena.base.as_ptr() as usize
    }

    #[test]
    fn packs_mixed_alignments() {
        let arena = Arena::with_capacity(64);

        let a = arena.allocate(7u32).unwrap();
        assert_eq!(offset_in(&arena, a as *const u32 as usize), 0);
        assert_eq!(arena.used(), 4);

        // 8-aligned value after a 4-byte one: four bytes of padding.
        let b = arena.allocate(11u64).unwrap();
        assert_eq!(offset_in(&arena, b as *const u64 as usize), 8);
        assert_eq!(arena.used(), 16);

        assert_eq!(*a, 7);
        assert_eq!(*b, 11);
    }

    #[test]
    fn fails_atomically_when_exhausted() {
        let arena = Arena::with_capacity(64);
        arena.allocate(0u32).unwrap();
        arena.allocate(0u64).unwrap();
        assert_eq!(arena.used(), 16);

        // 16 + 50 > 64: rejected without moving the cursor.
        assert!(arena.allocate([0u8; 50]).is_none());
        assert_eq!(arena.used(), 16);
        assert_eq!(arena.failure_count(), 1);

        // A fitting request still succeeds afterwards.
        assert!(arena.allocate([0u8; 48]).is_some());
        assert_eq!(arena.used(), 64);
    }

    #[test]
    fn fills_exact_capacity_boundary() {
        let arena = Arena::with_capacity(64);
        for i in 0..8 {
            arena.allocate(i as u64).unwrap();
        }
        assert_eq!(arena.used(), 64);
        assert!(arena.allocate(0u8).is_none());
        assert_eq!(arena.used(), 64);
    }

    #[test]
    fn reuses_offset_zero_after_reset() {
        let mut arena = Arena::with_capacity(64);
        let first = arena.allocate(1u32).unwrap() as *const u32 as usize;
        arena.allocate(2u64).unwrap();

        arena.reset();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.generation(), 1);

        let again = arena.allocate(3u32).unwrap() as *const u32 as usize;
        assert_eq!(first, again);
        assert_eq!(arena.used(), 4);
    }

    #[test]
    fn constructs_in_place_exactly_once() {
        let arena = Arena::with_capacity(64);
        let mut runs = 0;
        let value = arena
            .allocate_with(|| {
                runs += 1;
                [3u16; 4]
            })
            .unwrap();
        assert_eq!(runs, 1);
        assert_eq!(value[3], 3);
    }

    #[test]
    fn init_never_runs_on_rejection() {
        let arena = Arena::with_capacity(8);
        let mut runs = 0;
        let rejected = arena.allocate_with(|| {
            runs += 1;
            [0u8; 16]
        });
        assert!(rejected.is_none());
        assert_eq!(runs, 0);
    }

    #[test]
    fn serves_over_aligned_types() {
        #[repr(align(64))]
        struct Page([u8; 64]);

        let arena = Arena::with_capacity(256);
        let page = arena.allocate(Page([0u8; 64])).unwrap();
        assert_eq!(page as *const Page as usize % 64, 0);
        page.0[63] = 0xFF;
        assert_eq!(page.0[63], 0xFF);
    }

    #[test]
    fn raw_layouts_report_remaining_space() {
        let arena = Arena::with_capacity(32);
        let layout = Layout::from_size_align(24, 8).unwrap();
        let ptr = arena.try_alloc_layout(layout).unwrap();
        assert_eq!(ptr.as_ptr() as usize % 8, 0);

        let err = arena.try_alloc_layout(layout).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfCapacity {
                requested: 24,
                align: 8,
                remaining: 8,
            }
        );
    }

    #[test]
    fn zero_sized_values_consume_nothing() {
        let arena = Arena::with_capacity(16);
        arena.allocate(()).unwrap();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.allocation_count(), 1);
    }

    #[test]
    #[should_panic(expected = "greater than zero")]
    fn rejects_zero_capacity() {
        let _ = Arena::with_capacity(0);
    }
}
