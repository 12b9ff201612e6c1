//! Stress test for scroll profiling.
//!
//! Extracts the hot loop from benches/scroll_benchmark.rs for flamegraph
//! profiling.
//!
//! Run with:
//!   cargo run --example stress_scroll --release -- [iterations]
//!
//! Profile with cargo-flamegraph:
//!   cargo flamegraph --example stress_scroll -- 10000

use std::cell::RefCell;
use std::rc::Rc;

use stickylist::engine::ViewportLayoutEngine;
use stickylist::index::SectionIndexer;
use stickylist::model::{RowKind, Viewport};
use stickylist::pool::RecyclingPool;
use stickylist::source::{SectionSpec, VecSource};

type Shared = Rc<RefCell<VecSource>>;

fn build_engine() -> ViewportLayoutEngine<Shared, RecyclingPool<Shared>> {
    let specs = (0..2_000)
        .map(|s| {
            let mut spec = SectionSpec::with_header(30);
            spec.has_footer = s % 4 == 0;
            spec
        })
        .collect();
    let source: Shared = Rc::new(RefCell::new(VecSource::new(specs)));
    let indexer = SectionIndexer::new(Rc::clone(&source));
    let pool = RecyclingPool::new(Rc::clone(&source)).with_heights(|kind, _| match kind {
        RowKind::Header | RowKind::GhostHeader => 48,
        RowKind::Item => 64,
        RowKind::Footer => 32,
    });
    ViewportLayoutEngine::new(indexer, pool, Viewport::new(800, 0))
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let iterations: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10_000);

    let mut engine = build_engine();
    engine.layout().expect("initial layout");
    let total = engine.indexer_mut().total_rows();
    eprintln!("Laid out {total} rows; running {iterations} scroll steps");

    let start = std::time::Instant::now();
    let mut down = true;
    let mut travelled: i64 = 0;
    for _ in 0..iterations {
        let delta = if down { 640 } else { -640 };
        let actual = engine.scroll_by(delta).expect("scroll step");
        travelled += i64::from(actual.abs());
        if actual.abs() < delta.abs() {
            // Content boundary: turn around.
            down = !down;
        }
    }
    let elapsed = start.elapsed();

    let stats = engine.pool().stats();
    eprintln!(
        "Done: {travelled} px in {elapsed:?} ({:.1} steps/ms)",
        iterations as f64 / elapsed.as_secs_f64() / 1000.0
    );
    eprintln!(
        "Pool: {} created, {} reused, {} live, {} pooled",
        stats.created, stats.reused, stats.live, stats.pooled
    );
}
