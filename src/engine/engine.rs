//! ViewportLayoutEngine - incremental viewport windowing with sticky headers.
//!
//! Maintains a minimal set of materialized rows covering the viewport, driven
//! by scroll deltas and structural invalidations, and continuously recomputes
//! each visible section header's pixel position under three competing
//! constraints: stick to the top, don't detach before the section's content
//! scrolls away, don't overlap the next section's header.
//!
//! Everything runs synchronously on one thread. Structural notifications that
//! arrive mid-pass must go through [`ViewportLayoutEngine::post_update`]; the
//! queue is drained at the start of the next layout pass.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::index::SectionIndexer;
use crate::model::{FlatPos, IndexError, LayoutError, Px, RowKind, Viewport};
use crate::pool::{PxRect, ViewId, ViewPool};
use crate::queue::{StructuralUpdate, UpdateQueue};
use crate::source::SectionSource;

use super::header::{HeaderChange, HeaderChangeListener, HeaderPlacement};
use super::saved_state::SavedState;
use super::visible::{VisibleRow, VisibleRowSet};

/// A computed smooth-scroll request for the host shim to animate.
///
/// The engine does not animate; it estimates the travel distance from the
/// tallest currently visible row and derives a speed-proportional duration,
/// falling back to the configured fixed duration for long jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothScrollPlan {
    /// Target flat position.
    pub target: FlatPos,
    /// Estimated travel distance in pixels.
    pub estimated_px: Px,
    /// Suggested animation duration.
    pub duration_ms: u32,
}

/// The layout/scroll engine.
///
/// Owns the [`SectionIndexer`] (its single source of structural truth) and a
/// [`ViewPool`] capability for materializing views. See the crate docs for
/// the overall control flow.
pub struct ViewportLayoutEngine<S: SectionSource, P: ViewPool> {
    indexer: SectionIndexer<S>,
    pool: P,
    viewport: Viewport,
    config: EngineConfig,
    visible: VisibleRowSet,
    header_states: HashMap<usize, HeaderPlacement>,
    first_visible: Option<(FlatPos, Px)>,
    pending_target: Option<FlatPos>,
    saved: Option<SavedState>,
    header_listener: Option<HeaderChangeListener>,
    queue: UpdateQueue,
}

impl<S: SectionSource, P: ViewPool> ViewportLayoutEngine<S, P> {
    /// Create an engine over an indexer and a pool.
    pub fn new(indexer: SectionIndexer<S>, pool: P, viewport: Viewport) -> Self {
        Self {
            indexer,
            pool,
            viewport,
            config: EngineConfig::default(),
            visible: VisibleRowSet::new(),
            header_states: HashMap::new(),
            first_visible: None,
            pending_target: None,
            saved: None,
            header_listener: None,
            queue: UpdateQueue::new(),
        }
    }

    /// Replace the tuning configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Borrow the section indexer.
    pub fn indexer(&self) -> &SectionIndexer<S> {
        &self.indexer
    }

    /// Mutably borrow the section indexer (selection API, direct structural
    /// notifications outside a pass).
    pub fn indexer_mut(&mut self) -> &mut SectionIndexer<S> {
        &mut self.indexer
    }

    /// Borrow the view pool.
    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// Current viewport geometry.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Change the viewport geometry. Callers follow up with
    /// [`ViewportLayoutEngine::layout`].
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Register the header placement-change callback.
    pub fn set_header_change_listener(&mut self, listener: HeaderChangeListener) {
        self.header_listener = Some(listener);
    }

    /// Iterate the currently materialized rows in flat-position order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &VisibleRow> {
        self.visible.iter()
    }

    /// The tracked first visible flat position and its pixel top.
    pub fn first_visible(&self) -> Option<(FlatPos, Px)> {
        self.first_visible
    }

    /// Last reported placement for `section`'s header.
    pub fn header_placement(&self, section: usize) -> HeaderPlacement {
        self.header_states
            .get(&section)
            .copied()
            .unwrap_or(HeaderPlacement::None)
    }

    /// Enqueue a structural update to be applied before the next layout pass.
    pub fn post_update(&mut self, update: StructuralUpdate) {
        self.queue.post(update);
    }

    // ===== Layout pass =====

    /// Full relayout: drain deferred updates, choose a start row, release and
    /// re-materialize the window, then recompute header placements.
    ///
    /// This engine does not attempt partial relayout diffing; the window is
    /// rebuilt from the chosen start row each time.
    pub fn layout(&mut self) -> Result<(), LayoutError> {
        for update in self.queue.drain() {
            self.apply_update(update)?;
        }

        let total = self.indexer.total_rows();
        if total == 0 {
            self.evict_all(true);
            self.first_visible = None;
            debug!("layout pass over empty data: released all views");
            return Ok(());
        }

        // Start row: explicit scroll-to target, else a valid saved position,
        // else the previously tracked first-visible row.
        let mut start_top = self.viewport.sticky_top();
        let start = if let Some(target) = self.pending_target.take() {
            FlatPos::new(target.get().min(total - 1))
        } else if let Some((position, top)) = self
            .saved
            .take()
            .and_then(|s| s.position_within(total).map(|p| (p, s.top_px)))
        {
            start_top = top;
            position
        } else if let Some((position, top)) = self.first_visible {
            start_top = top;
            FlatPos::new(position.get().min(total - 1))
        } else {
            FlatPos::new(0)
        };

        self.evict_all(false);
        self.fill_from(start, start_top, total)?;
        debug!(
            start = start.get(),
            rows = self.visible.len(),
            "layout pass filled viewport"
        );

        // A sparse data set or an enlarged viewport leaves a shortfall at the
        // bottom; pull earlier content in through the scroll step.
        let shortfall = self
            .visible
            .bottommost_in_stream()
            .map(|row| (self.viewport.bottom_edge() - row.bottom).max(0))
            .unwrap_or(0);
        if shortfall > 0 {
            self.scroll_by(-shortfall)?;
        } else {
            self.finish_pass()?;
        }
        Ok(())
    }

    fn apply_update(&mut self, update: StructuralUpdate) -> Result<(), IndexError> {
        match update {
            StructuralUpdate::SectionInserted(at) => self.indexer.notify_section_inserted(at),
            StructuralUpdate::SectionRemoved(at) => self.indexer.notify_section_removed(at),
            StructuralUpdate::SectionChanged(at) => self.indexer.notify_section_changed(at),
            StructuralUpdate::ItemsInserted {
                section,
                offset,
                count,
            } => self.indexer.notify_items_inserted(section, offset, count),
            StructuralUpdate::ItemsRemoved {
                section,
                offset,
                count,
            } => self.indexer.notify_items_removed(section, offset, count),
            StructuralUpdate::ItemsChanged {
                section,
                offset,
                count,
            } => self.indexer.notify_items_changed(section, offset, count),
            StructuralUpdate::FooterInserted(section) => {
                self.indexer.notify_footer_inserted(section)
            }
            StructuralUpdate::FooterRemoved(section) => self.indexer.notify_footer_removed(section),
            StructuralUpdate::FooterChanged(section) => self.indexer.notify_footer_changed(section),
            StructuralUpdate::Collapsed { section, collapsed } => {
                self.indexer.set_section_collapsed(section, collapsed)
            }
            StructuralUpdate::Reload => {
                self.indexer.notify_reload();
                Ok(())
            }
        }
        .map(|_| ())
    }

    /// Walk forward from `start`, stacking rows until the viewport's bottom
    /// edge is reached (inclusive) or data is exhausted.
    fn fill_from(&mut self, start: FlatPos, start_top: Px, total: usize) -> Result<(), LayoutError> {
        // Starting on a ghost: back up to its owning header so the pair is
        // vended together and the header's height is known.
        let mut pos = start;
        if self.indexer.row_kind_of(pos)? == RowKind::GhostHeader {
            pos = pos.prev().unwrap_or(pos);
        }

        let mut cursor = start_top;
        loop {
            let info = self.indexer.row_info_of(pos)?;
            let advance;
            match info.kind {
                RowKind::Header => {
                    // Vend the header and its ghost together: the ghost
                    // reserves the header's measured height in the stream.
                    let (height, _) = self.ensure_header_at(info.section, cursor)?;
                    let ghost_info = self.indexer.row_info_of(pos.next())?;
                    let ghost_view = self.pool.acquire(ghost_info)?;
                    self.insert_row(ghost_view, ghost_info.position, info.section, RowKind::GhostHeader, cursor, cursor + height);
                    cursor += height;
                    advance = 2;
                }
                RowKind::GhostHeader => {
                    // Only reachable defensively; the start-adjust above and
                    // the pair vend consume ghosts.
                    let (height, _) = self.ensure_header_at(info.section, cursor)?;
                    let ghost_view = self.pool.acquire(info)?;
                    self.insert_row(ghost_view, pos, info.section, RowKind::GhostHeader, cursor, cursor + height);
                    cursor += height;
                    advance = 1;
                }
                RowKind::Item | RowKind::Footer => {
                    let view = self.pool.acquire(info)?;
                    let height = self.pool.measure(view);
                    self.insert_row(view, pos, info.section, info.kind, cursor, cursor + height);
                    cursor += height;
                    advance = 1;
                }
            }
            if cursor >= self.viewport.bottom_edge() {
                break;
            }
            let next = pos.get() + advance;
            if next >= total {
                break;
            }
            pos = FlatPos::new(next);
        }
        Ok(())
    }

    // ===== Scroll step =====

    /// Scroll by `delta` viewport-local pixels. Positive reveals content
    /// further down the list; negative reveals content toward the start.
    ///
    /// Returns the actual distance scrolled, which is smaller in magnitude
    /// than `delta` when a content boundary is reached first: scrolling stops
    /// with the first row's top at the sticky target, or the last row's
    /// bottom aligned to the viewport's bottom edge.
    pub fn scroll_by(&mut self, delta: Px) -> Result<Px, LayoutError> {
        if delta == 0 || self.visible.is_empty() {
            return Ok(0);
        }
        let actual = if delta < 0 {
            -self.scroll_toward_start(-delta)?
        } else {
            self.scroll_toward_end(delta)?
        };
        trace!(delta, actual, "scroll step");
        self.finish_pass()?;
        Ok(actual)
    }

    /// Post-step bookkeeping: recycle what left the viewport (so tracking
    /// sees only surviving rows), retrack the first visible row, and
    /// recompute header placements.
    fn finish_pass(&mut self) -> Result<(), LayoutError> {
        self.recycle_offscreen();
        self.retrack_first_visible();
        self.update_headers()
    }

    /// Content moves down; earlier rows are revealed. `magnitude > 0`.
    fn scroll_toward_start(&mut self, magnitude: Px) -> Result<Px, LayoutError> {
        let sticky_top = self.viewport.sticky_top();
        let mut consumed = 0;
        while consumed < magnitude {
            let Some(top_row) = self.visible.topmost_in_stream().copied() else {
                break;
            };
            // How far the window may shift down before the topmost row's top
            // crosses the viewport's top edge.
            let headroom = (sticky_top - top_row.top).max(0);
            let step = headroom.min(magnitude - consumed);
            if step > 0 {
                self.shift_all(step);
                consumed += step;
                if consumed >= magnitude {
                    break;
                }
            }
            let Some(prev) = self.prev_in_stream(top_row.position)? else {
                break;
            };
            let new_top = top_row.top + step;
            self.materialize_above(prev, new_top)?;
        }
        Ok(consumed)
    }

    /// Content moves up; later rows are revealed. `magnitude > 0`.
    fn scroll_toward_end(&mut self, magnitude: Px) -> Result<Px, LayoutError> {
        let total = self.indexer.total_rows();
        let bottom_edge = self.viewport.bottom_edge();
        let mut consumed = 0;
        while consumed < magnitude {
            let Some(bottom_row) = self.visible.bottommost_in_stream().copied() else {
                break;
            };
            // Content already materialized below the fold.
            let slack = (bottom_row.bottom - bottom_edge).max(0);
            let step = slack.min(magnitude - consumed);
            if step > 0 {
                self.shift_all(-step);
                consumed += step;
                if consumed >= magnitude {
                    break;
                }
            }
            let next = bottom_row.position.next();
            if next.get() >= total {
                break;
            }
            let new_bottom = bottom_row.bottom - step;
            self.materialize_below(next, new_bottom)?;
        }
        Ok(consumed)
    }

    /// The in-stream position directly before `position`, skipping backward
    /// over a header row to its preceding sibling.
    fn prev_in_stream(&mut self, position: FlatPos) -> Result<Option<FlatPos>, LayoutError> {
        let Some(prev) = position.prev() else {
            return Ok(None);
        };
        if self.indexer.row_kind_of(prev)? == RowKind::Header {
            return Ok(prev.prev());
        }
        Ok(Some(prev))
    }

    /// Materialize the row at `position` with its bottom edge at `bottom`.
    fn materialize_above(&mut self, position: FlatPos, bottom: Px) -> Result<(), LayoutError> {
        let info = self.indexer.row_info_of(position)?;
        match info.kind {
            RowKind::GhostHeader => {
                // Backing into a ghost: its owning header must be materialized
                // for the correct height.
                let (height, _) = self.ensure_header_at(info.section, bottom)?;
                let view = self.pool.acquire(info)?;
                self.insert_row(view, position, info.section, RowKind::GhostHeader, bottom - height, bottom);
            }
            RowKind::Header => {
                // prev_in_stream skips headers; nothing to lay out.
                debug_assert!(false, "materialize_above reached a header row");
            }
            RowKind::Item | RowKind::Footer => {
                let view = self.pool.acquire(info)?;
                let height = self.pool.measure(view);
                self.insert_row(view, position, info.section, info.kind, bottom - height, bottom);
            }
        }
        Ok(())
    }

    /// Materialize the row at `position` with its top edge at `top`.
    fn materialize_below(&mut self, position: FlatPos, top: Px) -> Result<(), LayoutError> {
        let info = self.indexer.row_info_of(position)?;
        match info.kind {
            RowKind::Header => {
                // Vend the header+ghost pair; the ghost is laid out with the
                // header's measured height.
                let (height, _) = self.ensure_header_at(info.section, top)?;
                let ghost_info = self.indexer.row_info_of(position.next())?;
                let ghost_view = self.pool.acquire(ghost_info)?;
                self.insert_row(ghost_view, ghost_info.position, info.section, RowKind::GhostHeader, top, top + height);
            }
            RowKind::GhostHeader => {
                let (height, _) = self.ensure_header_at(info.section, top)?;
                let view = self.pool.acquire(info)?;
                self.insert_row(view, position, info.section, RowKind::GhostHeader, top, top + height);
            }
            RowKind::Item | RowKind::Footer => {
                let view = self.pool.acquire(info)?;
                let height = self.pool.measure(view);
                self.insert_row(view, position, info.section, info.kind, top, top + height);
            }
        }
        Ok(())
    }

    /// Materialize `section`'s header if it is not already in the window.
    /// Returns its measured height and view. New header records are placed at
    /// `fallback_top`; the header pass repositions them.
    fn ensure_header_at(
        &mut self,
        section: usize,
        fallback_top: Px,
    ) -> Result<(Px, ViewId), LayoutError> {
        if let Some(header) = self.visible.header_of(section) {
            return Ok((header.height(), header.view));
        }
        let position = self
            .indexer
            .header_position(section)?
            .expect("ensure_header_at called for a headerless section");
        let info = self.indexer.row_info_of(position)?;
        let view = self.pool.acquire(info)?;
        let height = self.pool.measure(view);
        self.insert_row(view, position, section, RowKind::Header, fallback_top, fallback_top + height);
        Ok((height, view))
    }

    fn insert_row(
        &mut self,
        view: ViewId,
        position: FlatPos,
        section: usize,
        kind: RowKind,
        top: Px,
        bottom: Px,
    ) {
        debug_assert!(bottom >= top, "row {position} has negative height");
        let row = VisibleRow {
            view,
            position,
            section,
            kind,
            top,
            bottom,
        };
        self.pool.commit(view, row.rect());
        self.visible.insert(row);
    }

    fn shift_all(&mut self, dy: Px) {
        self.visible.shift_all(dy);
        for row in self.visible.iter() {
            self.pool.commit(row.view, row.rect());
        }
    }

    // ===== Header pass =====

    /// Recompute every visible section header's placement from current child
    /// bounds, materializing headers for sections that entered the window
    /// without one, and fire transition notifications.
    fn update_headers(&mut self) -> Result<(), LayoutError> {
        let sticky_top = self.viewport.sticky_top();
        for section in self.visible.sections() {
            let sec = self.indexer.section(section)?;
            if !sec.has_header() {
                continue;
            }
            let (height, view) = self.ensure_header_at(section, sticky_top)?;

            let mut top = sticky_top;
            let mut placement = HeaderPlacement::Sticky;
            if let Some(ghost) = self.visible.ghost_of(section) {
                if ghost.top >= sticky_top {
                    // The section hasn't started sticking yet; the header
                    // rests at the ghost's natural position.
                    top = ghost.top;
                    placement = HeaderPlacement::Natural;
                }
            }
            if let Some(next) = self.visible.first_in_stream_after_section(section) {
                if next.top - height < top {
                    // Pushed off by the incoming section.
                    top = next.top - height;
                    placement = HeaderPlacement::Trailing;
                }
            }

            let header_position = self
                .visible
                .header_of(section)
                .map(|h| h.position)
                .expect("header materialized above");
            if let Some(record) = self.visible.get_mut(header_position) {
                record.top = top;
                record.bottom = top + height;
            }
            self.pool.commit(view, PxRect::new(top, top + height));
            self.report_placement(section, view, placement);
        }
        Ok(())
    }

    fn report_placement(&mut self, section: usize, view: ViewId, new: HeaderPlacement) {
        let old = self.header_placement(section);
        if old == new {
            return;
        }
        trace!(section, %old, %new, "header placement changed");
        if new == HeaderPlacement::None {
            self.header_states.remove(&section);
        } else {
            self.header_states.insert(section, new);
        }
        if let Some(listener) = self.header_listener.as_mut() {
            listener(HeaderChange {
                section,
                view,
                old,
                new,
            });
        }
    }

    // ===== Recycling and tracking =====

    /// Release rows that left the viewport. A non-header row is recyclable
    /// once entirely above or below the viewport; a header only once its
    /// section has no other visible member (it must keep sticking while any
    /// of its content is still transitioning through).
    fn recycle_offscreen(&mut self) {
        let height = self.viewport.height;
        let gone = self
            .visible
            .extract(|row| row.in_stream() && (row.bottom <= 0 || row.top >= height));
        for row in &gone {
            self.pool.release(row.view);
        }

        let orphaned: Vec<VisibleRow> = self
            .visible
            .iter()
            .filter(|row| {
                row.kind == RowKind::Header && self.visible.section_member_count(row.section) == 1
            })
            .copied()
            .collect();
        for header in orphaned {
            self.visible.remove(header.position);
            self.pool.release(header.view);
            self.report_placement(header.section, header.view, HeaderPlacement::None);
        }
    }

    /// Release every materialized view. With `reset_headers`, also fire
    /// `-> None` transitions (data went away for real, not a relayout).
    fn evict_all(&mut self, reset_headers: bool) {
        let rows = self.visible.drain();
        for row in &rows {
            self.pool.release(row.view);
        }
        if reset_headers {
            for row in rows {
                if row.kind == RowKind::Header {
                    self.report_placement(row.section, row.view, HeaderPlacement::None);
                }
            }
            self.header_states.clear();
        }
    }

    /// Track the first visible row and its pixel top. The top is capped at
    /// the viewport's top padding so an overscroll gap above the first row is
    /// preserved rather than treated as content offset.
    fn retrack_first_visible(&mut self) {
        self.first_visible = self
            .visible
            .topmost_in_stream()
            .map(|row| (row.position, row.top.min(self.viewport.sticky_top())));
    }

    // ===== Programmatic scrolling =====

    /// Jump to `position`: records the target and runs a full layout pass
    /// (superseding any prior pending target).
    ///
    /// # Errors
    /// [`IndexError::PositionOutOfRange`] if `position` is outside
    /// `[0, total)`.
    pub fn scroll_to(&mut self, position: FlatPos) -> Result<(), LayoutError> {
        let total = self.indexer.total_rows();
        if position.get() >= total {
            return Err(IndexError::PositionOutOfRange { position, total }.into());
        }
        self.pending_target = Some(position);
        self.layout()
    }

    /// Plan a smooth scroll to `position` for the host shim to animate.
    ///
    /// The per-row pixel estimate is the tallest currently visible row, so
    /// perceived speed tracks actual row geometry; beyond the configured
    /// distance threshold the fixed default duration applies instead.
    ///
    /// # Errors
    /// [`IndexError::PositionOutOfRange`] if `position` is outside
    /// `[0, total)`.
    pub fn smooth_scroll_plan(&mut self, position: FlatPos) -> Result<SmoothScrollPlan, LayoutError> {
        let total = self.indexer.total_rows();
        if position.get() >= total {
            return Err(IndexError::PositionOutOfRange { position, total }.into());
        }
        let row_estimate = self
            .visible
            .iter()
            .map(|row| row.height())
            .max()
            .unwrap_or(0);
        let from = self
            .first_visible
            .map(|(p, _)| p.get())
            .unwrap_or(0);
        let rows = position.get().abs_diff(from);
        let estimated_px =
            Px::try_from(row_estimate as i64 * rows as i64).unwrap_or(Px::MAX);
        let duration_ms = if estimated_px > self.config.smooth_distance_threshold_px {
            self.config.smooth_default_duration_ms
        } else {
            (estimated_px as f32 / self.config.smooth_speed_px_per_ms).round() as u32
        };
        Ok(SmoothScrollPlan {
            target: position,
            estimated_px,
            duration_ms,
        })
    }

    // ===== Saved state =====

    /// Capture the restart token for the current scroll position.
    pub fn save_state(&self) -> SavedState {
        match self.first_visible {
            Some((position, top)) => SavedState::new(position, top),
            None => SavedState::invalid(),
        }
    }

    /// Restore a restart token; it applies on the next layout pass if still
    /// structurally valid, and is discarded otherwise.
    pub fn restore_state(&mut self, state: SavedState) {
        self.saved = Some(state);
    }

    // ===== Queries =====

    /// First visible row of `kind` in flat order. With `fully_visible`, rows
    /// clipped by the nearest preceding sticky header's bottom edge (or the
    /// viewport's edges) are excluded.
    pub fn first_visible_row(&self, kind: RowKind, fully_visible: bool) -> Option<&VisibleRow> {
        self.visible
            .iter()
            .find(|row| row.kind == kind && self.passes_visibility(row, fully_visible))
    }

    /// Last visible row of `kind` in flat order. With `fully_visible`, rows
    /// whose bottom is clipped against the viewport's bottom edge (or whose
    /// top is obscured by a sticky header) are excluded.
    pub fn last_visible_row(&self, kind: RowKind, fully_visible: bool) -> Option<&VisibleRow> {
        let mut result = None;
        for row in self.visible.iter() {
            if row.kind == kind && self.passes_visibility(row, fully_visible) {
                result = Some(row);
            }
        }
        result
    }

    fn passes_visibility(&self, row: &VisibleRow, fully: bool) -> bool {
        let partially = row.bottom > 0 && row.top < self.viewport.height;
        if !fully {
            return partially;
        }
        // Nearest preceding sticky header's bottom edge obscures row tops.
        let clip_top = self
            .visible
            .iter()
            .filter(|h| h.kind == RowKind::Header && h.position < row.position)
            .last()
            .map(|h| h.bottom)
            .unwrap_or(0)
            .max(0);
        partially && row.top >= clip_top && row.bottom <= self.viewport.bottom_edge()
    }
}
