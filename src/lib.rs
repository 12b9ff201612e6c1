//! Sticky section-header list layout engine.
//!
//! A list is divided into sections, each optionally beginning with a header
//! that "sticks" to the top of the viewport while its section's rows scroll
//! beneath it, handing off to the next section's header. The crate provides
//! the two host-independent components behind that behavior:
//!
//! - [`index::SectionIndexer`] - maps between section/offset coordinates and
//!   the flat row sequence, and owns selection/collapse overlay state
//! - [`engine::ViewportLayoutEngine`] - materializes a sliding window of rows
//!   through a view-pool capability, steps it under scroll deltas, and tracks
//!   each header's Natural/Sticky/Trailing placement
//!
//! Host toolkits integrate through a thin adapter shim: the data source
//! implements [`source::SectionSource`] (+ [`source::RowFactory`]), the
//! toolkit's recycling primitives sit behind [`pool::ViewPool`], and the shim
//! forwards scroll deltas and structural notifications. The hard logic stays
//! unit-testable without instantiating real views.

pub mod config;
pub mod engine;
pub mod index;
pub mod logging;
pub mod model;
pub mod pool;
pub mod queue;
pub mod source;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
