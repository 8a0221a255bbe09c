//! ## stapel-core::report
//! **Human-readable views over arena state**
//!
//! Read-only renderers: a region-by-region memory map driven by the
//! ledger, and a usage summary with a proportional text bar. Both
//! return owned strings and mutate nothing.

use std::fmt::Write;

use crate::arena::Arena;
use crate::ledger::Ledger;

/// Bar width used by [`Arena::usage_summary`].
pub const DEFAULT_BAR_WIDTH: usize = 20;

impl Arena {
    /// Renders one row per contiguous region in address order: padding
    /// gaps inferred between ledger entries, each allocation with its
    /// type tag, and the trailing free region.
    ///
    /// Without the `ledger` feature only the totals and the free region
    /// are available.
    pub fn memory_map(&self) -> String {
        let mut out = String::new();

        if Ledger::ENABLED {
            let _ = writeln!(out, "--- Arena Memory Map ---");
        } else {
            let _ = writeln!(
                out,
                "--- Arena Memory Map (build with feature `ledger` for per-allocation rows) ---"
            );
        }
        let _ = writeln!(
            out,
            "Capacity: {} bytes | Used: {} bytes",
            self.capacity(),
            self.used()
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<18}{:<25}{}", "Offset", "Region", "Size");
        let _ = writeln!(out, "{}", "-".repeat(50));

        let mut last_end = 0usize;
        for record in self.ledger().snapshot() {
            if record.offset > last_end {
                row(&mut out, last_end, "(padding)", record.offset - last_end);
            }
            row(&mut out, record.offset, record.type_tag, record.size);
            last_end = record.offset + record.size;
        }

        if self.used() < self.capacity() {
            row(&mut out, self.used(), "(free)", self.capacity() - self.used());
        }
        let _ = writeln!(out, "{}", "-".repeat(50));

        out
    }

    /// Usage totals plus a bar filled proportionally to `used/capacity`,
    /// [`DEFAULT_BAR_WIDTH`] columns wide.
    pub fn usage_summary(&self) -> String {
        self.usage_summary_width(DEFAULT_BAR_WIDTH)
    }

    /// [`Arena::usage_summary`] with a caller-chosen bar width.
    pub fn usage_summary_width(&self, width: usize) -> String {
        let used = self.used();
        let capacity = self.capacity();
        let percent = used as f64 / capacity as f64 * 100.0;
        let filled = used * width / capacity;

        let mut out = String::new();
        let _ = writeln!(out, "----------- Memory Stats -----------");
        let _ = writeln!(out, " Used:     {} bytes", used);
        let _ = writeln!(out, " Capacity: {} bytes", capacity);
        let _ = writeln!(out, " Usage:    {:.2}%", percent);
        let _ = writeln!(
            out,
            " Visual:   [{}{}]",
            "#".repeat(filled),
            " ".repeat(width - filled)
        );
        let _ = writeln!(out, "------------------------------------");
        out
    }
}

fn row(out: &mut String, offset: usize, region: &str, size: usize) {
    let _ = writeln!(out, "{:<18}{:<25}{}", format!("+ {}", offset), region, size);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_ratio_and_bar() {
        let arena = Arena::with_capacity(64);
        arena.allocate(0u32).unwrap();
        arena.allocate(0u64).unwrap();

        let summary = arena.usage_summary();
        assert!(summary.contains("Used:     16 bytes"));
        assert!(summary.contains("Capacity: 64 bytes"));
        assert!(summary.contains("Usage:    25.00%"));
        // 16/64 of 20 columns: 5 filled, 15 empty.
        assert!(summary.contains("[#####               ]"));
    }

    #[test]
    fn summary_bar_saturates_when_full() {
        let arena = Arena::with_capacity(32);
        arena.allocate([0u8; 32]).unwrap();

        let summary = arena.usage_summary_width(10);
        assert!(summary.contains("Usage:    100.00%"));
        assert!(summary.contains("[##########]"));
    }

    #[test]
    fn map_always_shows_totals_and_free_region() {
        let arena = Arena::with_capacity(64);
        arena.allocate(0u64).unwrap();

        let map = arena.memory_map();
        assert!(map.contains("Capacity: 64 bytes | Used: 8 bytes"));
        assert!(map.contains("(free)"));
        assert!(map.contains("56"));
    }

    #[cfg(feature = "ledger")]
    #[test]
    fn map_lists_regions_with_inferred_padding() {
        let arena = Arena::with_capacity(64);
        arena.allocate(0u32).unwrap();
        arena.allocate(0u64).unwrap();

        let map = arena.memory_map();
        let lines: Vec<&str> = map.lines().collect();

        let u32_row = lines.iter().position(|l| l.contains("u32")).unwrap();
        let pad_row = lines.iter().position(|l| l.contains("(padding)")).unwrap();
        let u64_row = lines.iter().position(|l| l.contains("u64")).unwrap();
        let free_row = lines.iter().position(|l| l.contains("(free)")).unwrap();

        assert!(u32_row < pad_row && pad_row < u64_row && u64_row < free_row);
        assert!(lines[pad_row].starts_with("+ 4"));
        assert!(lines[u64_row].starts_with("+ 8"));
        assert!(lines[free_row].starts_with("+ 16"));
    }

    #[cfg(not(feature = "ledger"))]
    #[test]
    fn map_names_the_feature_when_rows_are_unavailable() {
        let arena = Arena::with_capacity(64);
        arena.allocate(0u32).unwrap();

        let map = arena.memory_map();
        assert!(map.contains("build with feature `ledger`"));
        assert!(!map.contains("u32"));
    }
}
