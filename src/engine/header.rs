//! Per-section header placement.
//!
//! A visible section's header is always in exactly one of three placements,
//! recomputed from current child pixel bounds on every layout/scroll pass
//! (never cached across passes):
//!
//! 1. **Natural** - the ghost placeholder's top edge is still at or below the
//!    sticky target, so the header rests at its natural in-stream position
//! 2. **Trailing** - the next section's first row, minus the header's height,
//!    is above the chosen top: the header is being pushed off-screen by the
//!    incoming section
//! 3. **Sticky** - otherwise, pinned exactly at the sticky target
//!
//! The recorded placement exists only to detect transitions and fire the
//! change callback; rendering always recomputes from scratch.

use crate::pool::ViewId;

/// Placement of one section's header, as last reported.
///
/// `None` is the initial state for a never-seen section and the state a
/// header returns to when it is evicted from the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPlacement {
    /// No placement reported (header not materialized).
    #[default]
    None,
    /// Resting at its natural in-stream position.
    Natural,
    /// Pinned at the viewport's sticky target.
    Sticky,
    /// Being pushed off by the next section's header.
    Trailing,
}

impl std::fmt::Display for HeaderPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Natural => "natural",
            Self::Sticky => "sticky",
            Self::Trailing => "trailing",
        };
        f.write_str(name)
    }
}

/// A header placement transition, delivered to the registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderChange {
    /// Section whose header moved.
    pub section: usize,
    /// The header's view handle.
    pub view: ViewId,
    /// Placement previously reported for the section.
    pub old: HeaderPlacement,
    /// Placement now in effect.
    pub new: HeaderPlacement,
}

/// Callback receiving [`HeaderChange`] notifications.
pub type HeaderChangeListener = Box<dyn FnMut(HeaderChange)>;
