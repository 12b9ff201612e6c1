//! Flat-position change notifications.
//!
//! Every structural notification the indexer receives in section/offset
//! coordinates is re-emitted to the presentation layer as an equivalent
//! contiguous flat-position range, so a host adapter can drive the toolkit's
//! own change animations.

use crate::model::FlatPos;

/// A structural change expressed in flat-position space.
///
/// `Removed` ranges are in pre-rebuild coordinates (where the rows used to
/// be); `Inserted` and `Changed` ranges are in post-rebuild coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatRangeEvent {
    /// `count` rows appeared starting at `start`.
    Inserted {
        /// First inserted flat position.
        start: FlatPos,
        /// Number of inserted rows.
        count: usize,
    },
    /// `count` rows disappeared starting at `start`.
    Removed {
        /// First removed flat position (pre-rebuild coordinates).
        start: FlatPos,
        /// Number of removed rows.
        count: usize,
    },
    /// `count` rows changed in place starting at `start`.
    Changed {
        /// First changed flat position.
        start: FlatPos,
        /// Number of changed rows.
        count: usize,
    },
    /// Everything changed; positions are not comparable across the rebuild.
    Reloaded,
}

/// Listener receiving [`FlatRangeEvent`]s from the indexer.
pub type ChangeListener = Box<dyn FnMut(FlatRangeEvent)>;
