//! Deferred structural-update queue.
//!
//! Everything runs synchronously on one thread, but structural notifications
//! issued *during* a layout/scroll pass must not mutate the materialized-view
//! set mid-pass. Application code posts such updates here instead; the engine
//! drains the queue at the start of its next layout pass. This is the
//! explicit, injectable stand-in for "post to the main-thread work queue".
//!
//! The engine does not reentrantly guard: callers own the discipline of using
//! the deferred path for mid-pass notifications.

use std::collections::VecDeque;

/// One deferred structural notification, mirroring the indexer's notify
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralUpdate {
    /// A section was inserted at the index.
    SectionInserted(usize),
    /// The section at the index was removed.
    SectionRemoved(usize),
    /// The section at the index changed in place.
    SectionChanged(usize),
    /// Items were inserted within a section.
    ItemsInserted {
        /// Owning section.
        section: usize,
        /// Offset of the first inserted item.
        offset: usize,
        /// Number of inserted items.
        count: usize,
    },
    /// Items were removed from a section.
    ItemsRemoved {
        /// Owning section.
        section: usize,
        /// Offset of the first removed item.
        offset: usize,
        /// Number of removed items.
        count: usize,
    },
    /// Items changed in place within a section.
    ItemsChanged {
        /// Owning section.
        section: usize,
        /// Offset of the first changed item.
        offset: usize,
        /// Number of changed items.
        count: usize,
    },
    /// A section gained a footer.
    FooterInserted(usize),
    /// A section lost its footer.
    FooterRemoved(usize),
    /// A section's footer changed in place.
    FooterChanged(usize),
    /// A section was collapsed or expanded.
    Collapsed {
        /// The section.
        section: usize,
        /// New collapse state.
        collapsed: bool,
    },
    /// Everything changed.
    Reload,
}

/// FIFO of deferred structural updates.
#[derive(Debug, Clone, Default)]
pub struct UpdateQueue {
    pending: VecDeque<StructuralUpdate>,
}

impl UpdateQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a deferred update.
    pub fn post(&mut self, update: StructuralUpdate) {
        self.pending.push_back(update);
    }

    /// Number of pending updates.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take all pending updates in posting order.
    pub fn drain(&mut self) -> Vec<StructuralUpdate> {
        self.pending.drain(..).collect()
    }
}
