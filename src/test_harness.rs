//! Test harness for engine scenarios.
//!
//! Wires a [`VecSource`] (shared between the indexer and the reference pool)
//! into a [`ViewportLayoutEngine`] with scripted row heights, plus helpers
//! for recording header transitions and dumping the materialized window.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{HeaderChange, ViewportLayoutEngine};
use crate::index::SectionIndexer;
use crate::model::{Px, RowKind, RowVariant, Viewport};
use crate::pool::RecyclingPool;
use crate::source::{SectionSpec, VecSource};

/// The shared in-memory source handle used by harness engines.
pub type SharedSource = Rc<RefCell<VecSource>>;

/// Engine type used across whitebox tests.
pub type TestEngine = ViewportLayoutEngine<SharedSource, RecyclingPool<SharedSource>>;

/// Height model giving every row the same height.
pub fn uniform_heights(height: Px) -> impl Fn(RowKind, RowVariant) -> Px + 'static {
    move |_, _| height
}

/// Height model with distinct header and item/footer heights.
pub fn header_item_heights(
    header: Px,
    item: Px,
) -> impl Fn(RowKind, RowVariant) -> Px + 'static {
    move |kind, _| match kind {
        RowKind::Header | RowKind::GhostHeader => header,
        RowKind::Item | RowKind::Footer => item,
    }
}

/// Build an engine over `specs` with the given viewport and height model.
pub fn engine_with(
    specs: Vec<SectionSpec>,
    viewport: Viewport,
    heights: impl Fn(RowKind, RowVariant) -> Px + 'static,
) -> TestEngine {
    let source: SharedSource = Rc::new(RefCell::new(VecSource::new(specs)));
    let indexer = SectionIndexer::new(Rc::clone(&source));
    let pool = RecyclingPool::new(Rc::clone(&source)).with_heights(heights);
    ViewportLayoutEngine::new(indexer, pool, viewport)
}

/// Record every header placement transition the engine reports.
pub fn record_header_changes(engine: &mut TestEngine) -> Rc<RefCell<Vec<HeaderChange>>> {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    engine.set_header_change_listener(Box::new(move |change| sink.borrow_mut().push(change)));
    changes
}

/// Render the materialized window as a table, one row per line, for snapshot
/// assertions.
pub fn dump_window(engine: &TestEngine) -> String {
    let mut lines: Vec<String> = engine
        .visible_rows()
        .map(|row| {
            format!(
                "{:>3} {:<7} s{} [{:>5}..{:>5})",
                row.position.get(),
                row.kind.to_string(),
                row.section,
                row.top,
                row.bottom
            )
        })
        .collect();
    if let Some((position, top)) = engine.first_visible() {
        lines.push(format!("first visible: {position} at {top}px"));
    }
    lines.join("\n")
}
