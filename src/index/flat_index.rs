//! FlatIndex - dense flat-position -> section lookup
//!
//! Rebuilt wholesale alongside the section list on every structural change;
//! there is no incremental maintenance.
//!
//! # Complexity
//!
//! - `rebuild`: O(total rows)
//! - `section_of`: O(1)
//! - `total` / `is_empty`: O(1)

use crate::model::{FlatPos, Section};

/// Dense mapping from flat position to owning section index, covering
/// `[0, total)`.
///
/// # Invariants
/// - section indices are monotonically non-decreasing over increasing flat
///   position
/// - every section occupies exactly `length` contiguous positions starting at
///   its `start_position`
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    map: Vec<u32>,
}

impl FlatIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a section list whose `start_position`s are already
    /// assigned (the indexer computes those as a running sum during its own
    /// rebuild).
    pub fn rebuild(&mut self, sections: &[Section]) {
        self.map.clear();
        let total = sections
            .last()
            .map(|s| s.end_position().get())
            .unwrap_or(0);
        self.map.reserve(total);
        for (index, section) in sections.iter().enumerate() {
            debug_assert_eq!(
                section.start_position().get(),
                self.map.len(),
                "section {index} start does not match running sum"
            );
            for _ in 0..section.length() {
                self.map.push(index as u32);
            }
        }
    }

    /// Owning section of `position`, or `None` outside `[0, total)`.
    pub fn section_of(&self, position: FlatPos) -> Option<usize> {
        self.map.get(position.get()).map(|&s| s as usize)
    }

    /// Total rows covered.
    pub fn total(&self) -> usize {
        self.map.len()
    }

    /// True when no rows are covered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop all entries, retaining capacity.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
