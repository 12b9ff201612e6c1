//! Viewport layout engine - windowing, scrolling, and sticky headers.
//!
//! # Module Structure
//!
//! - `visible`: VisibleRow / VisibleRowSet - the materialized window and its
//!   per-view metadata side table
//! - `header`: HeaderPlacement - the per-section header state machine values
//!   and change notification surface
//! - `saved_state`: SavedState - the scroll-position restart token
//! - `engine`: ViewportLayoutEngine - layout passes, scroll stepping,
//!   recycling, queries

pub mod engine;
pub mod header;
pub mod saved_state;
pub mod visible;

pub use engine::{SmoothScrollPlan, ViewportLayoutEngine};
pub use header::{HeaderChange, HeaderChangeListener, HeaderPlacement};
pub use saved_state::SavedState;
pub use visible::{VisibleRow, VisibleRowSet};
