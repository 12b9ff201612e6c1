//! Selection and collapse overlays.
//!
//! Overlay state is keyed by section index (and item offset within a
//! section) and survives index rebuilds by *translation*: structural edits
//! shift the keys rather than recomputing the state. The shifting rules are
//! the ones a caller performing destructive edits expects:
//!
//! - inserting `n` items at offset `k` shifts selected offsets `>= k` up by
//!   `n`
//! - removing `[k, k+n)` drops selected offsets inside the range and shifts
//!   offsets `>= k+n` down by `n`
//! - inserting/removing a whole section shifts every per-section key at or
//!   beyond it by one; a removed section's entry is dropped entirely

use std::collections::{BTreeMap, BTreeSet};

/// One selected entity, as visited by selection traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectedEntity {
    /// A section selected as a whole.
    Section(usize),
    /// A selected footer.
    Footer(usize),
    /// A selected item.
    Item {
        /// Owning section.
        section: usize,
        /// Item offset within the section.
        offset: usize,
    },
}

/// Row-level selection state for one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSelection {
    /// Whole-section flag. While set it masks the row-level state below.
    pub whole: bool,
    /// Footer selected.
    pub footer: bool,
    /// Selected item offsets.
    pub items: BTreeSet<usize>,
}

impl SectionSelection {
    fn is_empty(&self) -> bool {
        !self.whole && !self.footer && self.items.is_empty()
    }
}

/// Per-section selection overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOverlay {
    sections: BTreeMap<usize, SectionSelection>,
}

impl SelectionOverlay {
    /// Whether `section` carries the whole-section flag.
    pub fn is_section_selected(&self, section: usize) -> bool {
        self.sections.get(&section).is_some_and(|s| s.whole)
    }

    /// Whether the item at `(section, offset)` is selected. The whole-section
    /// flag masks (implies) item-level selection.
    pub fn is_item_selected(&self, section: usize, offset: usize) -> bool {
        self.sections
            .get(&section)
            .is_some_and(|s| s.whole || s.items.contains(&offset))
    }

    /// Whether `section`'s footer is selected (masked by the whole-section
    /// flag like items).
    pub fn is_footer_selected(&self, section: usize) -> bool {
        self.sections
            .get(&section)
            .is_some_and(|s| s.whole || s.footer)
    }

    /// Set or clear the whole-section flag. Clearing reveals whatever
    /// row-level state was recorded before the flag was set.
    pub fn set_section_selected(&mut self, section: usize, selected: bool) {
        if selected {
            self.sections.entry(section).or_default().whole = true;
        } else if let Some(state) = self.sections.get_mut(&section) {
            state.whole = false;
            if state.is_empty() {
                self.sections.remove(&section);
            }
        }
    }

    /// Toggle an item's selection, returning the new state. Callers must
    /// check the whole-section flag first; the indexer enforces that.
    pub fn toggle_item(&mut self, section: usize, offset: usize) -> bool {
        let state = self.sections.entry(section).or_default();
        let selected = if state.items.remove(&offset) {
            false
        } else {
            state.items.insert(offset);
            true
        };
        if state.is_empty() {
            self.sections.remove(&section);
        }
        selected
    }

    /// Toggle a footer's selection, returning the new state.
    pub fn toggle_footer(&mut self, section: usize) -> bool {
        let state = self.sections.entry(section).or_default();
        state.footer = !state.footer;
        let selected = state.footer;
        if state.is_empty() {
            self.sections.remove(&section);
        }
        selected
    }

    /// True when nothing is selected anywhere.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Drop all selection state, returning what was selected (callers re-emit
    /// change notifications from it).
    pub fn clear(&mut self) -> Vec<SelectedEntity> {
        let drained = std::mem::take(&mut self.sections);
        let mut entities = Vec::new();
        for (section, state) in drained {
            if state.whole {
                entities.push(SelectedEntity::Section(section));
                continue;
            }
            if state.footer {
                entities.push(SelectedEntity::Footer(section));
            }
            for offset in state.items {
                entities.push(SelectedEntity::Item { section, offset });
            }
        }
        entities
    }

    /// Visit selected entities in descending section order; within a section
    /// the footer first, then items in descending offset order. This ordering
    /// lets a visitor remove what it visits without invalidating the indices
    /// of entries not yet visited.
    pub fn traverse(&self, mut visitor: impl FnMut(SelectedEntity)) {
        for (&section, state) in self.sections.iter().rev() {
            if state.whole {
                visitor(SelectedEntity::Section(section));
                continue;
            }
            if state.footer {
                visitor(SelectedEntity::Footer(section));
            }
            for &offset in state.items.iter().rev() {
                visitor(SelectedEntity::Item { section, offset });
            }
        }
    }

    /// Translate for an insertion of `count` items at `offset` in `section`.
    pub fn items_inserted(&mut self, section: usize, offset: usize, count: usize) {
        if let Some(state) = self.sections.get_mut(&section) {
            state.items = state
                .items
                .iter()
                .map(|&i| if i >= offset { i + count } else { i })
                .collect();
        }
    }

    /// Translate for a removal of `[offset, offset + count)` in `section`.
    pub fn items_removed(&mut self, section: usize, offset: usize, count: usize) {
        let drop_entry = if let Some(state) = self.sections.get_mut(&section) {
            state.items = state
                .items
                .iter()
                .filter(|&&i| i < offset || i >= offset + count)
                .map(|&i| if i >= offset + count { i - count } else { i })
                .collect();
            state.is_empty()
        } else {
            false
        };
        if drop_entry {
            self.sections.remove(&section);
        }
    }

    /// Translate for a whole-section insertion at `at`.
    pub fn section_inserted(&mut self, at: usize) {
        self.sections = std::mem::take(&mut self.sections)
            .into_iter()
            .map(|(s, state)| (if s >= at { s + 1 } else { s }, state))
            .collect();
    }

    /// Translate for a whole-section removal at `at`; the removed section's
    /// entry is dropped entirely.
    pub fn section_removed(&mut self, at: usize) {
        self.sections = std::mem::take(&mut self.sections)
            .into_iter()
            .filter(|&(s, _)| s != at)
            .map(|(s, state)| (if s > at { s - 1 } else { s }, state))
            .collect();
    }

    /// Drop the footer flag for `section` (its footer was removed).
    pub fn footer_removed(&mut self, section: usize) {
        let drop_entry = if let Some(state) = self.sections.get_mut(&section) {
            state.footer = false;
            state.is_empty()
        } else {
            false
        };
        if drop_entry {
            self.sections.remove(&section);
        }
    }

    /// Drop entries for sections at or beyond `section_count` (after a full
    /// reload shrank the data).
    pub fn prune_beyond(&mut self, section_count: usize) {
        self.sections.retain(|&s, _| s < section_count);
    }
}

/// Per-section collapse overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseOverlay {
    collapsed: BTreeSet<usize>,
}

impl CollapseOverlay {
    /// Whether `section` is collapsed.
    pub fn is_collapsed(&self, section: usize) -> bool {
        self.collapsed.contains(&section)
    }

    /// Set the collapse flag; returns true when the flag actually changed.
    pub fn set_collapsed(&mut self, section: usize, collapsed: bool) -> bool {
        if collapsed {
            self.collapsed.insert(section)
        } else {
            self.collapsed.remove(&section)
        }
    }

    /// Translate for a whole-section insertion at `at`.
    pub fn section_inserted(&mut self, at: usize) {
        self.collapsed = std::mem::take(&mut self.collapsed)
            .into_iter()
            .map(|s| if s >= at { s + 1 } else { s })
            .collect();
    }

    /// Translate for a whole-section removal at `at`.
    pub fn section_removed(&mut self, at: usize) {
        self.collapsed = std::mem::take(&mut self.collapsed)
            .into_iter()
            .filter(|&s| s != at)
            .map(|s| if s > at { s - 1 } else { s })
            .collect();
    }

    /// Drop entries for sections at or beyond `section_count`.
    pub fn prune_beyond(&mut self, section_count: usize) {
        self.collapsed.retain(|&s| s < section_count);
    }
}
