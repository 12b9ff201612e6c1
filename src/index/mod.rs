//! Section index layer - flat-position mapping and overlay state.
//!
//! # Module Structure
//!
//! - `flat_index`: FlatIndex - dense flat-position -> section lookup
//! - `overlay`: SelectionOverlay / CollapseOverlay - per-section state that
//!   survives rebuilds via key translation
//! - `events`: FlatRangeEvent - flat-position change notifications
//! - `indexer`: SectionIndexer - the component tying them together

pub mod events;
pub mod flat_index;
pub mod indexer;
pub mod overlay;

pub use events::{ChangeListener, FlatRangeEvent};
pub use flat_index::FlatIndex;
pub use indexer::SectionIndexer;
pub use overlay::{CollapseOverlay, SelectedEntity, SelectionOverlay};
