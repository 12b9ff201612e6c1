//! Scroll-position restart token.

use serde::{Deserialize, Serialize};

use crate::model::{FlatPos, Px};

/// Minimal persisted scroll state: the first visible flat position and its
/// pixel top.
///
/// Restored on the next layout pass if the position is still within the
/// current data bounds; otherwise silently discarded. `first_visible` is
/// `None` when there was nothing to save (empty data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SavedState {
    /// First visible flat position at save time.
    pub first_visible: Option<usize>,
    /// That row's pixel top at save time.
    pub top_px: Px,
}

impl SavedState {
    /// Token for a tracked `(position, top)` pair.
    pub fn new(first_visible: FlatPos, top_px: Px) -> Self {
        Self {
            first_visible: Some(first_visible.get()),
            top_px,
        }
    }

    /// Token recording "nothing visible".
    pub fn invalid() -> Self {
        Self::default()
    }

    /// The saved position if it is valid for a list of `total` rows.
    pub fn position_within(&self, total: usize) -> Option<FlatPos> {
        self.first_visible
            .filter(|&p| p < total)
            .map(FlatPos::new)
    }
}
