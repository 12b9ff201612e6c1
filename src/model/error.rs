//! Error types for the layout engine and section index.
//!
//! A small hierarchical taxonomy built on `thiserror`:
//!
//! - [`IndexError`] - precondition violations against the section index
//!   (out-of-range positions/sections/offsets, selection toggles while a
//!   whole-section flag is active)
//! - [`PoolError`] - capability contract violations from the view pool
//! - [`LayoutError`] - top-level engine error wrapping both via `From`,
//!   composing with `?`
//!
//! # Failure policy
//!
//! Every variant here is a caller or capability bug, not an environmental
//! fault: there is no I/O in this core, so there is no retry machinery and no
//! partial-failure recovery. The failing operation aborts and the error
//! propagates; callers validate against current counts before calling.

use thiserror::Error;

use super::types::FlatPos;

/// Precondition violations against the section index.
///
/// These indicate caller bugs: the offending value plus the bound it violated
/// are carried for the panic-free equivalent of a fail-fast assertion. None of
/// these are retried or recovered.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum IndexError {
    /// A flat position outside `[0, total)`.
    #[error("flat position {position} out of range (total rows: {total})")]
    PositionOutOfRange {
        /// The requested flat position.
        position: FlatPos,
        /// Total rows in the index at the time of the call.
        total: usize,
    },

    /// A section index outside `[0, section_count)`.
    #[error("section {section} out of range (section count: {count})")]
    SectionOutOfRange {
        /// The requested section index.
        section: usize,
        /// Section count at the time of the call.
        count: usize,
    },

    /// An item offset at or beyond the owning section's item count.
    #[error("item offset {offset} out of range in section {section} (item count: {item_count})")]
    OffsetOutOfRange {
        /// The owning section.
        section: usize,
        /// The requested item offset.
        offset: usize,
        /// The section's item count at the time of the call.
        item_count: usize,
    },

    /// An item- or footer-level selection toggle while the whole-section
    /// selection flag is set. The flag masks row-level state; callers must
    /// deselect the section first.
    #[error("section {section} is selected as a whole; clear it before toggling rows")]
    SelectionLocked {
        /// The section whose whole-selection flag is active.
        section: usize,
    },
}

/// Capability contract violations from the view pool.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The pool (or the row-creation callback behind it) produced no view for
    /// a position the engine must materialize. Layout cannot proceed without
    /// a view, so this is fatal to the current pass.
    #[error("view pool produced no view for flat position {position}")]
    ViewCreation {
        /// The flat position that could not be materialized.
        position: FlatPos,
    },
}

/// Top-level layout engine error.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A section-index precondition violation surfaced through the engine.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// A view-pool capability violation.
    #[error(transparent)]
    Pool(#[from] PoolError),
}
