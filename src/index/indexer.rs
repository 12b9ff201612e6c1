//! SectionIndexer - the flat-position section index.
//!
//! Single source of truth translating between the caller's
//! section/local-offset view of the data and the flat coordinate space the
//! layout engine operates in. Owns the selection and collapse overlays and
//! keeps them consistent across structural edits.
//!
//! The whole index is discarded and rebuilt on every structural change
//! (O(sections + total rows)); there is no incremental section mutation.
//! Queries trigger a lazy rebuild when the index is stale, which is why they
//! take `&mut self`.

use tracing::debug;

use crate::model::{FlatPos, IndexError, RowKind, RowVariant, Section};
use crate::pool::RowInfo;
use crate::source::SectionSource;

use super::events::{ChangeListener, FlatRangeEvent};
use super::flat_index::FlatIndex;
use super::overlay::{CollapseOverlay, SelectedEntity, SelectionOverlay};

/// Section index over a [`SectionSource`].
///
/// Leaf component: it has no dependency on the layout engine. The engine
/// queries it for "what is at flat position N" whenever it materializes a
/// row.
pub struct SectionIndexer<S: SectionSource> {
    source: S,
    sections: Vec<Section>,
    flat: FlatIndex,
    selection: SelectionOverlay,
    collapse: CollapseOverlay,
    listener: Option<ChangeListener>,
    stale: bool,
}

impl<S: SectionSource> SectionIndexer<S> {
    /// Create an indexer over `source`. The index is built lazily on first
    /// query.
    pub fn new(source: S) -> Self {
        Self {
            source,
            sections: Vec::new(),
            flat: FlatIndex::new(),
            selection: SelectionOverlay::default(),
            collapse: CollapseOverlay::default(),
            listener: None,
            stale: true,
        }
    }

    /// Borrow the backing source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Register the listener receiving flat-range change events.
    pub fn set_change_listener(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    /// Mark the index stale; the next query rebuilds it.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Recompute all sections and the flat index from the source.
    pub fn rebuild(&mut self) {
        let count = self.source.section_count();
        self.sections.clear();
        let mut start = 0;
        for s in 0..count {
            let section = Section::new(
                self.source.item_count(s),
                self.source.has_header(s),
                self.source.has_footer(s),
                self.collapse.is_collapsed(s),
                FlatPos::new(start),
            );
            start += section.length();
            self.sections.push(section);
        }
        self.flat.rebuild(&self.sections);
        self.stale = false;
        debug!(sections = count, total_rows = start, "section index rebuilt");
    }

    fn ensure_index(&mut self) {
        if self.stale {
            self.rebuild();
        }
    }

    fn emit(&mut self, event: FlatRangeEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(event);
        }
    }

    // ===== Queries =====

    /// Total rows across all sections (headers, ghosts, items, footers).
    pub fn total_rows(&mut self) -> usize {
        self.ensure_index();
        self.flat.total()
    }

    /// Number of sections.
    pub fn section_count(&mut self) -> usize {
        self.ensure_index();
        self.sections.len()
    }

    /// Structural snapshot of `section`.
    pub fn section(&mut self, section: usize) -> Result<Section, IndexError> {
        self.ensure_index();
        self.sections
            .get(section)
            .copied()
            .ok_or(IndexError::SectionOutOfRange {
                section,
                count: self.sections.len(),
            })
    }

    /// Owning section of `position`.
    pub fn section_of(&mut self, position: FlatPos) -> Result<usize, IndexError> {
        self.ensure_index();
        self.flat
            .section_of(position)
            .ok_or(IndexError::PositionOutOfRange {
                position,
                total: self.flat.total(),
            })
    }

    /// Row kind at `position`.
    pub fn row_kind_of(&mut self, position: FlatPos) -> Result<RowKind, IndexError> {
        let section = self.section_of(position)?;
        let s = self.sections[section];
        Ok(s.kind_at(position.get() - s.start_position().get()))
    }

    /// Everything a pool needs to materialize the row at `position`: owning
    /// section, kind, variant and (for items) the item offset.
    pub fn row_info_of(&mut self, position: FlatPos) -> Result<RowInfo, IndexError> {
        let section = self.section_of(position)?;
        let s = self.sections[section];
        let local = position.get() - s.start_position().get();
        let kind = s.kind_at(local);
        let (variant, item_offset) = match kind {
            RowKind::Header => (self.source.header_variant(section), None),
            RowKind::GhostHeader => (RowVariant::DEFAULT, None),
            RowKind::Footer => (self.source.footer_variant(section), None),
            RowKind::Item => {
                let offset = local - if s.has_header() { 2 } else { 0 };
                (self.source.item_variant(section, offset), Some(offset))
            }
        };
        Ok(RowInfo {
            position,
            section,
            kind,
            variant,
            item_offset,
        })
    }

    /// Flat position of `section`'s header, or `None` without one.
    pub fn header_position(&mut self, section: usize) -> Result<Option<FlatPos>, IndexError> {
        let s = self.section(section)?;
        Ok(s.header_local()
            .map(|local| FlatPos::new(s.start_position().get() + local)))
    }

    /// Flat position of `section`'s ghost header, or `None` without one.
    pub fn ghost_position(&mut self, section: usize) -> Result<Option<FlatPos>, IndexError> {
        let s = self.section(section)?;
        Ok(s.ghost_local()
            .map(|local| FlatPos::new(s.start_position().get() + local)))
    }

    /// Flat position of `section`'s footer, or `None` without one.
    pub fn footer_position(&mut self, section: usize) -> Result<Option<FlatPos>, IndexError> {
        let s = self.section(section)?;
        Ok(s.footer_local()
            .map(|local| FlatPos::new(s.start_position().get() + local)))
    }

    /// Flat position of the item at `offset` within `section`.
    pub fn item_position(&mut self, section: usize, offset: usize) -> Result<FlatPos, IndexError> {
        let s = self.section(section)?;
        if offset >= s.item_count() {
            return Err(IndexError::OffsetOutOfRange {
                section,
                offset,
                item_count: s.item_count(),
            });
        }
        Ok(FlatPos::new(s.start_position().get() + s.item_local(offset)))
    }

    // ===== Structural notifications =====
    //
    // The source has already been edited when these arrive. Each one
    // translates the overlays, rebuilds the index, and re-emits the change in
    // flat coordinates (removal ranges in pre-rebuild coordinates, insertion
    // ranges in post-rebuild coordinates).

    /// A section was inserted at `at`.
    pub fn notify_section_inserted(&mut self, at: usize) -> Result<(), IndexError> {
        let count = self.source.section_count();
        if at >= count {
            return Err(IndexError::SectionOutOfRange { section: at, count });
        }
        self.selection.section_inserted(at);
        self.collapse.section_inserted(at);
        self.rebuild();
        let s = self.sections[at];
        self.emit(FlatRangeEvent::Inserted {
            start: s.start_position(),
            count: s.length(),
        });
        Ok(())
    }

    /// The section at `at` was removed.
    pub fn notify_section_removed(&mut self, at: usize) -> Result<(), IndexError> {
        let removed = (!self.stale).then(|| self.sections.get(at).copied()).flatten();
        self.selection.section_removed(at);
        self.collapse.section_removed(at);
        self.rebuild();
        match removed {
            Some(s) => self.emit(FlatRangeEvent::Removed {
                start: s.start_position(),
                count: s.length(),
            }),
            // No pre-edit geometry to report against.
            None => self.emit(FlatRangeEvent::Reloaded),
        }
        Ok(())
    }

    /// The section at `at` changed in place (contents rebind, structure
    /// unchanged).
    pub fn notify_section_changed(&mut self, at: usize) -> Result<(), IndexError> {
        self.rebuild();
        let s = self
            .sections
            .get(at)
            .copied()
            .ok_or(IndexError::SectionOutOfRange {
                section: at,
                count: self.sections.len(),
            })?;
        self.emit(FlatRangeEvent::Changed {
            start: s.start_position(),
            count: s.length(),
        });
        Ok(())
    }

    /// `count` items were inserted at `offset` within `section`.
    pub fn notify_items_inserted(
        &mut self,
        section: usize,
        offset: usize,
        count: usize,
    ) -> Result<(), IndexError> {
        self.selection.items_inserted(section, offset, count);
        self.rebuild();
        let s = self
            .sections
            .get(section)
            .copied()
            .ok_or(IndexError::SectionOutOfRange {
                section,
                count: self.sections.len(),
            })?;
        // A collapsed section contributes no rows; nothing to announce.
        if !s.is_collapsed() {
            self.emit(FlatRangeEvent::Inserted {
                start: FlatPos::new(s.start_position().get() + s.item_local(offset)),
                count,
            });
        }
        Ok(())
    }

    /// Items `[offset, offset + count)` were removed from `section`.
    pub fn notify_items_removed(
        &mut self,
        section: usize,
        offset: usize,
        count: usize,
    ) -> Result<(), IndexError> {
        let removed = (!self.stale)
            .then(|| self.sections.get(section).copied())
            .flatten()
            .filter(|s| !s.is_collapsed())
            .map(|s| FlatPos::new(s.start_position().get() + s.item_local(offset)));
        self.selection.items_removed(section, offset, count);
        self.rebuild();
        if self.sections.get(section).is_none() {
            return Err(IndexError::SectionOutOfRange {
                section,
                count: self.sections.len(),
            });
        }
        match removed {
            Some(start) => self.emit(FlatRangeEvent::Removed { start, count }),
            None => self.emit(FlatRangeEvent::Reloaded),
        }
        Ok(())
    }

    /// Items `[offset, offset + count)` changed in place within `section`.
    pub fn notify_items_changed(
        &mut self,
        section: usize,
        offset: usize,
        count: usize,
    ) -> Result<(), IndexError> {
        self.rebuild();
        let s = self
            .sections
            .get(section)
            .copied()
            .ok_or(IndexError::SectionOutOfRange {
                section,
                count: self.sections.len(),
            })?;
        if !s.is_collapsed() {
            self.emit(FlatRangeEvent::Changed {
                start: FlatPos::new(s.start_position().get() + s.item_local(offset)),
                count,
            });
        }
        Ok(())
    }

    /// `section` gained a footer.
    pub fn notify_footer_inserted(&mut self, section: usize) -> Result<(), IndexError> {
        self.rebuild();
        let position = self.footer_position(section)?;
        if let Some(start) = position {
            self.emit(FlatRangeEvent::Inserted { start, count: 1 });
        }
        Ok(())
    }

    /// `section` lost its footer.
    pub fn notify_footer_removed(&mut self, section: usize) -> Result<(), IndexError> {
        let removed = (!self.stale)
            .then(|| self.sections.get(section).copied())
            .flatten()
            .and_then(|s| {
                s.footer_local()
                    .map(|local| FlatPos::new(s.start_position().get() + local))
            });
        self.selection.footer_removed(section);
        self.rebuild();
        if self.sections.get(section).is_none() {
            return Err(IndexError::SectionOutOfRange {
                section,
                count: self.sections.len(),
            });
        }
        match removed {
            Some(start) => self.emit(FlatRangeEvent::Removed { start, count: 1 }),
            None => self.emit(FlatRangeEvent::Reloaded),
        }
        Ok(())
    }

    /// `section`'s footer changed in place.
    pub fn notify_footer_changed(&mut self, section: usize) -> Result<(), IndexError> {
        self.rebuild();
        if let Some(start) = self.footer_position(section)? {
            self.emit(FlatRangeEvent::Changed { start, count: 1 });
        }
        Ok(())
    }

    /// Everything changed; rebuild and announce a full reload. Overlay keys
    /// are preserved (they still name the same section indices); entries for
    /// sections beyond the new count are pruned.
    pub fn notify_reload(&mut self) {
        self.rebuild();
        let count = self.sections.len();
        self.selection.prune_beyond(count);
        self.collapse.prune_beyond(count);
        self.emit(FlatRangeEvent::Reloaded);
    }

    // ===== Collapse =====

    /// Whether `section` is collapsed.
    pub fn is_section_collapsed(&mut self, section: usize) -> Result<bool, IndexError> {
        self.section(section)?;
        Ok(self.collapse.is_collapsed(section))
    }

    /// Collapse or expand `section`, announcing the hidden/revealed item rows.
    pub fn set_section_collapsed(
        &mut self,
        section: usize,
        collapsed: bool,
    ) -> Result<(), IndexError> {
        let before = self.section(section)?;
        if !self.collapse.set_collapsed(section, collapsed) {
            return Ok(());
        }
        self.rebuild();
        let after = self.sections[section];
        if collapsed {
            let start = FlatPos::new(before.start_position().get() + before.item_local(0));
            let count = before.effective_item_count();
            if count > 0 {
                self.emit(FlatRangeEvent::Removed { start, count });
            }
        } else {
            let start = FlatPos::new(after.start_position().get() + after.item_local(0));
            let count = after.effective_item_count();
            if count > 0 {
                self.emit(FlatRangeEvent::Inserted { start, count });
            }
        }
        Ok(())
    }

    // ===== Selection =====

    /// Whether `section` carries the whole-section selection flag.
    pub fn is_section_selected(&mut self, section: usize) -> Result<bool, IndexError> {
        self.section(section)?;
        Ok(self.selection.is_section_selected(section))
    }

    /// Set or clear the whole-section selection flag. While set, it masks all
    /// row-level selection state in the section.
    pub fn set_section_selected(
        &mut self,
        section: usize,
        selected: bool,
    ) -> Result<(), IndexError> {
        self.section(section)?;
        self.selection.set_section_selected(section, selected);
        Ok(())
    }

    /// Whether the item at `(section, offset)` is selected (directly or via
    /// the whole-section flag).
    pub fn is_item_selected(&mut self, section: usize, offset: usize) -> Result<bool, IndexError> {
        let s = self.section(section)?;
        if offset >= s.item_count() {
            return Err(IndexError::OffsetOutOfRange {
                section,
                offset,
                item_count: s.item_count(),
            });
        }
        Ok(self.selection.is_item_selected(section, offset))
    }

    /// Toggle the item at `(section, offset)`, returning the new state.
    ///
    /// Fails with [`IndexError::SelectionLocked`] while the whole-section
    /// flag is set: the flag masks row-level state, so callers must
    /// deselect-then-toggle.
    pub fn toggle_item_selected(
        &mut self,
        section: usize,
        offset: usize,
    ) -> Result<bool, IndexError> {
        let s = self.section(section)?;
        if offset >= s.item_count() {
            return Err(IndexError::OffsetOutOfRange {
                section,
                offset,
                item_count: s.item_count(),
            });
        }
        if self.selection.is_section_selected(section) {
            return Err(IndexError::SelectionLocked { section });
        }
        Ok(self.selection.toggle_item(section, offset))
    }

    /// Whether `section`'s footer is selected.
    pub fn is_footer_selected(&mut self, section: usize) -> Result<bool, IndexError> {
        self.section(section)?;
        Ok(self.selection.is_footer_selected(section))
    }

    /// Toggle `section`'s footer selection, returning the new state. Fails
    /// with [`IndexError::SelectionLocked`] while the whole-section flag is
    /// set.
    pub fn toggle_footer_selected(&mut self, section: usize) -> Result<bool, IndexError> {
        self.section(section)?;
        if self.selection.is_section_selected(section) {
            return Err(IndexError::SelectionLocked { section });
        }
        Ok(self.selection.toggle_footer(section))
    }

    /// Drop all selection state, re-emitting a `Changed` notification for
    /// every previously selected row so the presentation layer can rebind.
    pub fn clear_selection(&mut self) {
        self.ensure_index();
        let entities = self.selection.clear();
        for entity in entities {
            let event = match entity {
                SelectedEntity::Section(s) => self.sections.get(s).map(|s| FlatRangeEvent::Changed {
                    start: s.start_position(),
                    count: s.length(),
                }),
                SelectedEntity::Footer(s) => {
                    self.footer_position(s)
                        .ok()
                        .flatten()
                        .map(|start| FlatRangeEvent::Changed { start, count: 1 })
                }
                SelectedEntity::Item { section, offset } => self
                    .item_position(section, offset)
                    .ok()
                    .map(|start| FlatRangeEvent::Changed { start, count: 1 }),
            };
            if let Some(event) = event {
                self.emit(event);
            }
        }
    }

    /// Visit selected entities in destruction-safe order: descending section
    /// order, footer before items, items in descending offset order.
    pub fn traverse_selection(&self, visitor: impl FnMut(SelectedEntity)) {
        self.selection.traverse(visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SectionSpec, VecSource};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn indexer(specs: Vec<SectionSpec>) -> SectionIndexer<VecSource> {
        SectionIndexer::new(VecSource::new(specs))
    }

    fn three_sections() -> SectionIndexer<VecSource> {
        // 5 + 2 + 4 = 11 rows
        indexer(vec![
            SectionSpec::with_header(3),
            SectionSpec::bare(2),
            SectionSpec::with_header(1).and_footer(),
        ])
    }

    fn recording_listener(
        indexer: &mut SectionIndexer<VecSource>,
    ) -> Rc<RefCell<Vec<FlatRangeEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        indexer.set_change_listener(Box::new(move |event| sink.borrow_mut().push(event)));
        events
    }

    mod queries {
        use super::*;

        #[test]
        fn total_rows_sums_section_lengths() {
            let mut idx = three_sections();
            assert_eq!(idx.total_rows(), 11);
        }

        #[test]
        fn section_of_resolves_each_run() {
            let mut idx = three_sections();
            assert_eq!(idx.section_of(FlatPos::new(0)).unwrap(), 0);
            assert_eq!(idx.section_of(FlatPos::new(4)).unwrap(), 0);
            assert_eq!(idx.section_of(FlatPos::new(5)).unwrap(), 1);
            assert_eq!(idx.section_of(FlatPos::new(7)).unwrap(), 2);
            assert_eq!(idx.section_of(FlatPos::new(10)).unwrap(), 2);
        }

        #[test]
        fn section_of_out_of_range_fails() {
            let mut idx = three_sections();
            assert_eq!(
                idx.section_of(FlatPos::new(11)),
                Err(IndexError::PositionOutOfRange {
                    position: FlatPos::new(11),
                    total: 11
                })
            );
        }

        #[test]
        fn row_kind_of_walks_section_layout() {
            let mut idx = three_sections();
            assert_eq!(idx.row_kind_of(FlatPos::new(0)).unwrap(), RowKind::Header);
            assert_eq!(
                idx.row_kind_of(FlatPos::new(1)).unwrap(),
                RowKind::GhostHeader
            );
            assert_eq!(idx.row_kind_of(FlatPos::new(2)).unwrap(), RowKind::Item);
            assert_eq!(idx.row_kind_of(FlatPos::new(5)).unwrap(), RowKind::Item);
            assert_eq!(idx.row_kind_of(FlatPos::new(10)).unwrap(), RowKind::Footer);
        }

        #[test]
        fn chrome_positions_round_trip_through_section_of() {
            let mut idx = three_sections();
            let header = idx.header_position(2).unwrap().unwrap();
            assert_eq!(idx.section_of(header).unwrap(), 2);
            let ghost = idx.ghost_position(2).unwrap().unwrap();
            assert_eq!(ghost, header.next());
            let footer = idx.footer_position(2).unwrap().unwrap();
            assert_eq!(idx.section_of(footer).unwrap(), 2);
            assert_eq!(idx.row_kind_of(footer).unwrap(), RowKind::Footer);
        }

        #[test]
        fn headerless_section_has_no_header_position() {
            let mut idx = three_sections();
            assert_eq!(idx.header_position(1).unwrap(), None);
            assert_eq!(idx.ghost_position(1).unwrap(), None);
            assert_eq!(idx.footer_position(1).unwrap(), None);
        }

        #[test]
        fn item_position_validates_offset() {
            let mut idx = three_sections();
            assert_eq!(idx.item_position(0, 0).unwrap(), FlatPos::new(2));
            assert_eq!(idx.item_position(1, 1).unwrap(), FlatPos::new(6));
            assert_eq!(
                idx.item_position(0, 3),
                Err(IndexError::OffsetOutOfRange {
                    section: 0,
                    offset: 3,
                    item_count: 3
                })
            );
        }

        #[test]
        fn section_out_of_range_fails() {
            let mut idx = three_sections();
            assert_eq!(
                idx.section(3),
                Err(IndexError::SectionOutOfRange {
                    section: 3,
                    count: 3
                })
            );
        }

        #[test]
        fn row_info_carries_item_offsets() {
            let mut idx = three_sections();
            let info = idx.row_info_of(FlatPos::new(3)).unwrap();
            assert_eq!(info.section, 0);
            assert_eq!(info.kind, RowKind::Item);
            assert_eq!(info.item_offset, Some(1));

            let info = idx.row_info_of(FlatPos::new(0)).unwrap();
            assert_eq!(info.kind, RowKind::Header);
            assert_eq!(info.item_offset, None);
        }

        #[test]
        fn rebuild_is_idempotent() {
            let mut idx = three_sections();
            idx.rebuild();
            let first: Vec<_> = (0..idx.total_rows())
                .map(|p| idx.section_of(FlatPos::new(p)).unwrap())
                .collect();
            idx.rebuild();
            let second: Vec<_> = (0..idx.total_rows())
                .map(|p| idx.section_of(FlatPos::new(p)).unwrap())
                .collect();
            assert_eq!(first, second);
        }
    }

    mod notifications {
        use super::*;

        #[test]
        fn section_insert_emits_new_flat_range() {
            let mut idx = three_sections();
            let events = recording_listener(&mut idx);
            idx.total_rows(); // build

            idx.source_mut_for_tests().insert_section(1, SectionSpec::with_header(2));
            idx.notify_section_inserted(1).unwrap();

            assert_eq!(
                events.borrow().as_slice(),
                &[FlatRangeEvent::Inserted {
                    start: FlatPos::new(5),
                    count: 4
                }]
            );
            assert_eq!(idx.total_rows(), 15);
        }

        #[test]
        fn section_remove_emits_old_flat_range() {
            let mut idx = three_sections();
            let events = recording_listener(&mut idx);
            idx.total_rows();

            idx.source_mut_for_tests().remove_section(0);
            idx.notify_section_removed(0).unwrap();

            assert_eq!(
                events.borrow().as_slice(),
                &[FlatRangeEvent::Removed {
                    start: FlatPos::new(0),
                    count: 5
                }]
            );
            assert_eq!(idx.total_rows(), 6);
        }

        #[test]
        fn section_remove_without_cached_geometry_reloads() {
            let mut idx = three_sections();
            let events = recording_listener(&mut idx);
            // Index never built: no pre-edit geometry to report.
            idx.source_mut_for_tests().remove_section(0);
            idx.notify_section_removed(0).unwrap();
            assert_eq!(events.borrow().as_slice(), &[FlatRangeEvent::Reloaded]);
        }

        #[test]
        fn item_insert_emits_flat_positions_after_rebuild() {
            let mut idx = three_sections();
            let events = recording_listener(&mut idx);
            idx.total_rows();

            idx.source_mut_for_tests().insert_items(1, 2);
            idx.notify_items_inserted(1, 2, 2).unwrap();

            assert_eq!(
                events.borrow().as_slice(),
                &[FlatRangeEvent::Inserted {
                    start: FlatPos::new(7),
                    count: 2
                }]
            );
        }

        #[test]
        fn item_remove_emits_pre_rebuild_positions() {
            let mut idx = three_sections();
            let events = recording_listener(&mut idx);
            idx.total_rows();

            idx.source_mut_for_tests().remove_items(0, 2);
            idx.notify_items_removed(0, 1, 2).unwrap();

            assert_eq!(
                events.borrow().as_slice(),
                &[FlatRangeEvent::Removed {
                    start: FlatPos::new(3),
                    count: 2
                }]
            );
            assert_eq!(idx.total_rows(), 9);
        }

        #[test]
        fn footer_insert_and_remove_announce_single_row() {
            let mut idx = indexer(vec![SectionSpec::bare(2)]);
            let events = recording_listener(&mut idx);
            idx.total_rows();

            idx.source_mut_for_tests().section_mut(0).has_footer = true;
            idx.notify_footer_inserted(0).unwrap();
            assert_eq!(
                events.borrow().last().unwrap(),
                &FlatRangeEvent::Inserted {
                    start: FlatPos::new(2),
                    count: 1
                }
            );

            idx.source_mut_for_tests().section_mut(0).has_footer = false;
            idx.notify_footer_removed(0).unwrap();
            assert_eq!(
                events.borrow().last().unwrap(),
                &FlatRangeEvent::Removed {
                    start: FlatPos::new(2),
                    count: 1
                }
            );
        }

        #[test]
        fn reload_emits_reloaded_and_prunes_overlays() {
            let mut idx = three_sections();
            let events = recording_listener(&mut idx);
            idx.set_section_selected(2, true).unwrap();

            idx.source_mut_for_tests().remove_section(2);
            idx.notify_reload();

            assert_eq!(events.borrow().last().unwrap(), &FlatRangeEvent::Reloaded);
            // Section 2 no longer exists; its overlay entry is gone.
            assert_eq!(
                idx.is_section_selected(2),
                Err(IndexError::SectionOutOfRange {
                    section: 2,
                    count: 2
                })
            );
        }

        #[test]
        fn selection_keys_shift_across_section_insert() {
            let mut idx = three_sections();
            idx.toggle_item_selected(1, 1).unwrap();

            idx.source_mut_for_tests().insert_section(0, SectionSpec::bare(1));
            idx.notify_section_inserted(0).unwrap();

            assert!(idx.is_item_selected(2, 1).unwrap());
        }
    }

    mod collapse {
        use super::*;

        #[test]
        fn collapsing_hides_items_and_emits_removal() {
            let mut idx = three_sections();
            let events = recording_listener(&mut idx);
            idx.total_rows();

            idx.set_section_collapsed(0, true).unwrap();
            assert_eq!(
                events.borrow().as_slice(),
                &[FlatRangeEvent::Removed {
                    start: FlatPos::new(2),
                    count: 3
                }]
            );
            assert_eq!(idx.total_rows(), 8);
            assert_eq!(idx.section(0).unwrap().length(), 2);
            assert!(idx.is_section_collapsed(0).unwrap());
        }

        #[test]
        fn expanding_restores_items_and_emits_insertion() {
            let mut idx = three_sections();
            idx.set_section_collapsed(0, true).unwrap();
            let events = recording_listener(&mut idx);

            idx.set_section_collapsed(0, false).unwrap();
            assert_eq!(
                events.borrow().as_slice(),
                &[FlatRangeEvent::Inserted {
                    start: FlatPos::new(2),
                    count: 3
                }]
            );
            assert_eq!(idx.total_rows(), 11);
        }

        #[test]
        fn redundant_collapse_is_a_no_op() {
            let mut idx = three_sections();
            let events = recording_listener(&mut idx);
            idx.set_section_collapsed(0, false).unwrap();
            assert!(events.borrow().is_empty());
        }
    }

    mod selection {
        use super::*;

        #[test]
        fn whole_section_marks_every_item_and_footer() {
            let mut idx = three_sections();
            idx.set_section_selected(2, true).unwrap();
            assert!(idx.is_item_selected(2, 0).unwrap());
            assert!(idx.is_footer_selected(2).unwrap());
        }

        #[test]
        fn toggles_are_locked_while_whole_flag_is_set() {
            let mut idx = three_sections();
            idx.set_section_selected(0, true).unwrap();
            assert_eq!(
                idx.toggle_item_selected(0, 1),
                Err(IndexError::SelectionLocked { section: 0 })
            );
            // Deselect-then-toggle works.
            idx.set_section_selected(0, false).unwrap();
            assert!(idx.toggle_item_selected(0, 1).unwrap());
        }

        #[test]
        fn footer_toggle_locked_while_whole_flag_is_set() {
            let mut idx = three_sections();
            idx.set_section_selected(2, true).unwrap();
            assert_eq!(
                idx.toggle_footer_selected(2),
                Err(IndexError::SelectionLocked { section: 2 })
            );
        }

        #[test]
        fn toggle_validates_offset_against_item_count() {
            let mut idx = three_sections();
            assert_eq!(
                idx.toggle_item_selected(1, 2),
                Err(IndexError::OffsetOutOfRange {
                    section: 1,
                    offset: 2,
                    item_count: 2
                })
            );
        }

        #[test]
        fn clear_selection_re_emits_changed_per_row() {
            let mut idx = three_sections();
            idx.toggle_item_selected(0, 1).unwrap();
            idx.toggle_footer_selected(2).unwrap();
            let events = recording_listener(&mut idx);

            idx.clear_selection();

            let events = events.borrow();
            assert!(events.contains(&FlatRangeEvent::Changed {
                start: FlatPos::new(3),
                count: 1
            }));
            assert!(events.contains(&FlatRangeEvent::Changed {
                start: FlatPos::new(10),
                count: 1
            }));
            assert!(!idx.is_item_selected(0, 1).unwrap());
        }

        #[test]
        fn traversal_is_descending_for_safe_removal() {
            let mut idx = three_sections();
            idx.toggle_item_selected(0, 0).unwrap();
            idx.toggle_item_selected(0, 2).unwrap();
            idx.set_section_selected(2, true).unwrap();

            let mut order = Vec::new();
            idx.traverse_selection(|e| order.push(e));
            assert_eq!(
                order,
                vec![
                    SelectedEntity::Section(2),
                    SelectedEntity::Item {
                        section: 0,
                        offset: 2
                    },
                    SelectedEntity::Item {
                        section: 0,
                        offset: 0
                    },
                ]
            );
        }
    }

    impl SectionIndexer<VecSource> {
        /// Test-only shortcut to edit the backing source in place.
        fn source_mut_for_tests(&mut self) -> &mut VecSource {
            &mut self.source
        }
    }
}
