//! Section geometry
//!
//! A [`Section`] is a contiguous logical run of rows: an optional header (with
//! its ghost placeholder), items, and an optional footer. Sections are
//! recomputed in full on every index rebuild; there is no incremental section
//! mutation.

use super::row::RowKind;
use super::types::FlatPos;

/// Structural snapshot of one section, as captured at the last index rebuild.
///
/// # Invariants
/// - `start_position` equals the running sum of prior sections' [`Section::length`]
/// - a collapsed section contributes zero items to `length` but keeps its
///   header/footer rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// Items in this section, excluding header/ghost/footer. This is the
    /// data source's count even while collapsed.
    item_count: usize,
    /// Whether the section begins with a header (and its ghost).
    has_header: bool,
    /// Whether the section ends with a footer.
    has_footer: bool,
    /// Whether the section is collapsed (items hidden).
    collapsed: bool,
    /// Flat offset of the section's first row.
    start_position: FlatPos,
}

impl Section {
    /// Create a section snapshot. Called by the indexer during rebuild.
    pub(crate) fn new(
        item_count: usize,
        has_header: bool,
        has_footer: bool,
        collapsed: bool,
        start_position: FlatPos,
    ) -> Self {
        Self {
            item_count,
            has_header,
            has_footer,
            collapsed,
            start_position,
        }
    }

    /// The data source's item count, regardless of collapse state.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Items currently contributing rows: zero while collapsed.
    pub fn effective_item_count(&self) -> usize {
        if self.collapsed {
            0
        } else {
            self.item_count
        }
    }

    /// Whether the section has a header.
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Whether the section has a footer.
    pub fn has_footer(&self) -> bool {
        self.has_footer
    }

    /// Whether the section is collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Flat offset of the section's first row.
    pub fn start_position(&self) -> FlatPos {
        self.start_position
    }

    /// Total rows this section occupies in the flat sequence.
    ///
    /// A header counts twice (header + ghost placeholder).
    pub fn length(&self) -> usize {
        self.effective_item_count()
            + if self.has_header { 2 } else { 0 }
            + if self.has_footer { 1 } else { 0 }
    }

    /// Flat offset one past the section's last row.
    pub fn end_position(&self) -> FlatPos {
        FlatPos::new(self.start_position.get() + self.length())
    }

    /// True if `position` falls inside this section's flat range.
    pub fn contains(&self, position: FlatPos) -> bool {
        position >= self.start_position && position < self.end_position()
    }

    /// Row kind at a local offset within this section.
    pub fn kind_at(&self, local_offset: usize) -> RowKind {
        RowKind::classify(self.has_header, self.has_footer, self.length(), local_offset)
    }

    /// Local offset of the header, if present.
    pub fn header_local(&self) -> Option<usize> {
        self.has_header.then_some(0)
    }

    /// Local offset of the ghost header, if present.
    pub fn ghost_local(&self) -> Option<usize> {
        self.has_header.then_some(1)
    }

    /// Local offset of the footer, if present.
    pub fn footer_local(&self) -> Option<usize> {
        self.has_footer.then(|| self.length() - 1)
    }

    /// Local offset of the item at `offset`. Does not bounds-check; the
    /// indexer validates against `item_count` first.
    pub fn item_local(&self, offset: usize) -> usize {
        offset + if self.has_header { 2 } else { 0 }
    }
}
