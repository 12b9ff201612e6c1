//! Reference view pool with per-kind recycle buckets.
//!
//! Wraps a [`RowFactory`] and recycles released views keyed by
//! `(RowKind, RowVariant)`, the same bucketing a host toolkit pool applies.
//! Heights come from a pluggable measurement function so tests and benchmarks
//! control row geometry precisely.

use std::collections::HashMap;

use crate::model::{FlatPos, PoolError, Px, RowKind, RowVariant};
use crate::source::RowFactory;

use super::{PxRect, RowInfo, ViewId, ViewPool};

/// Default measured heights, by kind.
fn default_heights(kind: RowKind, _variant: RowVariant) -> Px {
    match kind {
        RowKind::Header | RowKind::GhostHeader => 48,
        RowKind::Item => 32,
        RowKind::Footer => 24,
    }
}

/// Lifecycle counters, exposed for recycling tests and the stress demo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Views created fresh through the factory.
    pub created: usize,
    /// Acquires satisfied from the recycle buckets.
    pub reused: usize,
    /// Views currently released and waiting in a bucket.
    pub pooled: usize,
    /// Views currently bound to a position.
    pub live: usize,
}

struct Slot<V> {
    view: V,
    kind: RowKind,
    variant: RowVariant,
    position: Option<FlatPos>,
    rect: PxRect,
}

/// In-memory [`ViewPool`] over a [`RowFactory`].
pub struct RecyclingPool<F: RowFactory> {
    factory: F,
    slots: Vec<Slot<F::View>>,
    buckets: HashMap<(RowKind, RowVariant), Vec<usize>>,
    height_fn: Box<dyn Fn(RowKind, RowVariant) -> Px>,
    stats: PoolStats,
}

impl<F: RowFactory> RecyclingPool<F> {
    /// Create a pool over `factory` with the default height model.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            slots: Vec::new(),
            buckets: HashMap::new(),
            height_fn: Box::new(default_heights),
            stats: PoolStats::default(),
        }
    }

    /// Replace the measurement function.
    pub fn with_heights(mut self, height_fn: impl Fn(RowKind, RowVariant) -> Px + 'static) -> Self {
        self.height_fn = Box::new(height_fn);
        self
    }

    /// Lifecycle counters.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Borrow the view behind `id`. Test-facing.
    pub fn view(&self, id: ViewId) -> &F::View {
        &self.slots[id.get()].view
    }

    fn create(&mut self, row: RowInfo) -> Result<usize, PoolError> {
        let view = match row.kind {
            RowKind::Header => self.factory.create_header_row(row.variant),
            RowKind::GhostHeader => self.factory.create_ghost_header_row(),
            RowKind::Item => self.factory.create_item_row(row.variant),
            RowKind::Footer => self.factory.create_footer_row(row.variant),
        }
        .ok_or(PoolError::ViewCreation {
            position: row.position,
        })?;

        self.stats.created += 1;
        self.slots.push(Slot {
            view,
            kind: row.kind,
            variant: row.variant,
            position: None,
            rect: PxRect::default(),
        });
        Ok(self.slots.len() - 1)
    }

    fn bind(&mut self, slot: usize, row: RowInfo) {
        let view = &mut self.slots[slot].view;
        match row.kind {
            RowKind::Header => self.factory.bind_header_row(view, row.section, row.variant),
            RowKind::GhostHeader => self.factory.bind_ghost_header_row(view, row.section),
            RowKind::Item => self.factory.bind_item_row(
                view,
                row.section,
                row.item_offset.unwrap_or(0),
                row.variant,
            ),
            RowKind::Footer => self.factory.bind_footer_row(view, row.section, row.variant),
        }
        self.slots[slot].position = Some(row.position);
    }
}

impl<F: RowFactory> ViewPool for RecyclingPool<F> {
    fn acquire(&mut self, row: RowInfo) -> Result<ViewId, PoolError> {
        let bucket = (row.kind, row.variant);
        let slot = match self.buckets.get_mut(&bucket).and_then(Vec::pop) {
            Some(slot) => {
                self.stats.reused += 1;
                self.stats.pooled -= 1;
                slot
            }
            None => self.create(row)?,
        };
        self.bind(slot, row);
        self.stats.live += 1;
        Ok(ViewId::new(slot))
    }

    fn measure(&mut self, view: ViewId) -> Px {
        let slot = &self.slots[view.get()];
        (self.height_fn)(slot.kind, slot.variant)
    }

    fn commit(&mut self, view: ViewId, rect: PxRect) {
        self.slots[view.get()].rect = rect;
    }

    fn release(&mut self, view: ViewId) {
        let slot = &mut self.slots[view.get()];
        if slot.position.take().is_none() {
            return; // already released
        }
        let bucket = (slot.kind, slot.variant);
        self.buckets.entry(bucket).or_default().push(view.get());
        self.stats.live -= 1;
        self.stats.pooled += 1;
    }

    fn rect(&self, view: ViewId) -> PxRect {
        self.slots[view.get()].rect
    }

    fn position(&self, view: ViewId) -> Option<FlatPos> {
        self.slots[view.get()].position
    }
}
