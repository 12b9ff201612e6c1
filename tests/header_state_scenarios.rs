//! Header state-machine scenarios: Natural -> Sticky -> Trailing -> evicted,
//! and the handoff between consecutive section headers.
//!
//! Geometry used throughout: 50px headers, 50px items, 500px viewport,
//! sections of 8 items (one section spans 450px of stream content).

use std::cell::RefCell;
use std::rc::Rc;

use stickylist::engine::{HeaderChange, HeaderPlacement, ViewportLayoutEngine};
use stickylist::index::SectionIndexer;
use stickylist::model::{RowKind, Viewport};
use stickylist::pool::RecyclingPool;
use stickylist::source::{SectionSpec, VecSource};

type Shared = Rc<RefCell<VecSource>>;
type Engine = ViewportLayoutEngine<Shared, RecyclingPool<Shared>>;

fn engine(section_count: usize) -> Engine {
    let specs = (0..section_count)
        .map(|_| SectionSpec::with_header(8))
        .collect();
    let source: Shared = Rc::new(RefCell::new(VecSource::new(specs)));
    let indexer = SectionIndexer::new(Rc::clone(&source));
    let pool = RecyclingPool::new(Rc::clone(&source)).with_heights(|_, _| 50);
    ViewportLayoutEngine::new(indexer, pool, Viewport::new(500, 0))
}

fn record(engine: &mut Engine) -> Rc<RefCell<Vec<HeaderChange>>> {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    engine.set_header_change_listener(Box::new(move |c| sink.borrow_mut().push(c)));
    changes
}

#[test]
fn header_rests_naturally_at_the_top_of_the_list() {
    let mut engine = engine(3);
    engine.layout().unwrap();

    assert_eq!(engine.header_placement(0), HeaderPlacement::Natural);
    let header = engine.visible_rows().find(|r| r.kind == RowKind::Header).unwrap();
    assert_eq!((header.top, header.bottom), (0, 50), "at its natural position");
}

#[test]
fn header_sticks_once_its_ghost_crosses_the_target() {
    let mut engine = engine(3);
    let changes = record(&mut engine);
    engine.layout().unwrap();

    // Any downward motion sends the ghost's top negative.
    engine.scroll_by(20).unwrap();
    assert_eq!(engine.header_placement(0), HeaderPlacement::Sticky);
    let header = engine
        .visible_rows()
        .find(|r| r.kind == RowKind::Header && r.section == 0)
        .unwrap();
    assert_eq!((header.top, header.bottom), (0, 50), "pinned at the target");

    assert!(changes.borrow().iter().any(|c| c.section == 0
        && c.old == HeaderPlacement::Natural
        && c.new == HeaderPlacement::Sticky));
}

#[test]
fn header_returns_to_natural_when_scrolled_back() {
    let mut engine = engine(3);
    engine.layout().unwrap();
    engine.scroll_by(20).unwrap();
    engine.scroll_by(-20).unwrap();
    assert_eq!(engine.header_placement(0), HeaderPlacement::Natural);
}

#[test]
fn next_section_pushes_the_pinned_header_into_trailing() {
    let mut engine = engine(3);
    let changes = record(&mut engine);
    engine.layout().unwrap();

    // Section 1's ghost sits at stream offset 450. Scrolled by 420 its top is
    // at 30px: 30 - 50 < 0 clamps section 0's header upward off-screen.
    engine.scroll_by(420).unwrap();
    assert_eq!(engine.header_placement(0), HeaderPlacement::Trailing);
    let header = engine
        .visible_rows()
        .find(|r| r.kind == RowKind::Header && r.section == 0)
        .unwrap();
    assert_eq!((header.top, header.bottom), (-20, 30), "pushed 20px off-screen");

    // The incoming header still rests on its own ghost.
    assert_eq!(engine.header_placement(1), HeaderPlacement::Natural);

    assert!(changes.borrow().iter().any(|c| c.section == 0
        && c.old == HeaderPlacement::Sticky
        && c.new == HeaderPlacement::Trailing));
}

#[test]
fn handoff_evicts_the_outgoing_header_with_its_last_row() {
    let mut engine = engine(3);
    let changes = record(&mut engine);
    engine.layout().unwrap();

    // At 450 the whole of section 0 has left the viewport. Staged so the
    // recorded placement passes through Trailing on the way out.
    engine.scroll_by(420).unwrap();
    engine.scroll_by(30).unwrap();
    assert_eq!(engine.header_placement(0), HeaderPlacement::None);
    assert!(
        !engine.visible_rows().any(|r| r.section == 0),
        "no section 0 rows remain materialized"
    );
    assert_eq!(engine.header_placement(1), HeaderPlacement::Natural);

    assert!(changes.borrow().iter().any(|c| c.section == 0
        && c.old == HeaderPlacement::Trailing
        && c.new == HeaderPlacement::None));

    // A little further and section 1's header pins in turn.
    engine.scroll_by(10).unwrap();
    assert_eq!(engine.header_placement(1), HeaderPlacement::Sticky);
}

#[test]
fn full_transition_sequence_is_reported_in_order() {
    let mut engine = engine(3);
    let changes = record(&mut engine);
    engine.layout().unwrap();
    engine.scroll_by(100).unwrap();
    engine.scroll_by(330).unwrap();
    engine.scroll_by(20).unwrap();

    let states_for_section_0: Vec<_> = changes
        .borrow()
        .iter()
        .filter(|c| c.section == 0)
        .map(|c| c.new)
        .collect();
    assert_eq!(
        states_for_section_0,
        vec![
            HeaderPlacement::Natural,
            HeaderPlacement::Sticky,
            HeaderPlacement::Trailing,
            HeaderPlacement::None,
        ]
    );
}

#[test]
fn each_transition_reports_the_previous_state() {
    let mut engine = engine(3);
    let changes = record(&mut engine);
    engine.layout().unwrap();
    engine.scroll_by(100).unwrap();
    engine.scroll_by(330).unwrap();
    engine.scroll_by(20).unwrap();

    let section_0_changes: Vec<_> = changes
        .borrow()
        .iter()
        .filter(|c| c.section == 0)
        .copied()
        .collect();
    assert_eq!(section_0_changes[0].old, HeaderPlacement::None);
    for pair in section_0_changes.windows(2) {
        assert_eq!(
            pair[1].old, pair[0].new,
            "every transition chains from the previously reported state"
        );
    }
}
