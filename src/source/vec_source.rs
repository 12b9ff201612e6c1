//! In-memory section source.
//!
//! Backs tests, benchmarks and the stress demo. Mutation methods edit the
//! backing structure only; callers still deliver the matching structural
//! notification to the indexer (or post it to the engine's update queue),
//! exactly as an application data source would.

use crate::model::{RowKind, RowVariant};

use super::{RowFactory, SectionSource};

/// Declarative shape of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    /// Items in the section, excluding header/ghost/footer.
    pub item_count: usize,
    /// Whether the section begins with a header.
    pub has_header: bool,
    /// Whether the section ends with a footer.
    pub has_footer: bool,
    /// Variant for the header view.
    pub header_variant: RowVariant,
    /// Variant for the footer view.
    pub footer_variant: RowVariant,
    /// Variant for every item view in the section.
    pub item_variant: RowVariant,
}

impl SectionSpec {
    /// Section of `item_count` items with a header and no footer.
    pub fn with_header(item_count: usize) -> Self {
        Self {
            item_count,
            has_header: true,
            ..Self::default()
        }
    }

    /// Section of `item_count` items with neither header nor footer.
    pub fn bare(item_count: usize) -> Self {
        Self {
            item_count,
            ..Self::default()
        }
    }

    /// Add a footer to this spec.
    pub fn and_footer(mut self) -> Self {
        self.has_footer = true;
        self
    }
}

impl Default for SectionSpec {
    fn default() -> Self {
        Self {
            item_count: 0,
            has_header: false,
            has_footer: false,
            header_variant: RowVariant::DEFAULT,
            footer_variant: RowVariant::DEFAULT,
            item_variant: RowVariant::DEFAULT,
        }
    }
}

/// A lightweight stand-in for a host toolkit view, produced by
/// [`VecSource`]'s [`RowFactory`] implementation. Records what was bound into
/// it, which is all tests need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubView {
    /// The row kind this view was created for.
    pub kind: RowKind,
    /// Section most recently bound into the view.
    pub section: usize,
    /// Item offset most recently bound (items only).
    pub item_offset: Option<usize>,
    /// Variant the view was created with.
    pub variant: RowVariant,
}

/// In-memory [`SectionSource`] over a list of [`SectionSpec`]s.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    sections: Vec<SectionSpec>,
}

impl VecSource {
    /// Create a source from section specs.
    pub fn new(sections: Vec<SectionSpec>) -> Self {
        Self { sections }
    }

    /// Insert a section at `index`, shifting later sections up.
    pub fn insert_section(&mut self, index: usize, spec: SectionSpec) {
        self.sections.insert(index, spec);
    }

    /// Remove the section at `index`.
    pub fn remove_section(&mut self, index: usize) -> SectionSpec {
        self.sections.remove(index)
    }

    /// Mutable access to one section's spec.
    pub fn section_mut(&mut self, index: usize) -> &mut SectionSpec {
        &mut self.sections[index]
    }

    /// Grow `section`'s item count by `count` (an item-range insertion).
    pub fn insert_items(&mut self, section: usize, count: usize) {
        self.sections[section].item_count += count;
    }

    /// Shrink `section`'s item count by `count` (an item-range removal).
    pub fn remove_items(&mut self, section: usize, count: usize) {
        let spec = &mut self.sections[section];
        spec.item_count = spec.item_count.saturating_sub(count);
    }
}

impl SectionSource for VecSource {
    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn item_count(&self, section: usize) -> usize {
        self.sections[section].item_count
    }

    fn has_header(&self, section: usize) -> bool {
        self.sections[section].has_header
    }

    fn has_footer(&self, section: usize) -> bool {
        self.sections[section].has_footer
    }

    fn header_variant(&self, section: usize) -> RowVariant {
        self.sections[section].header_variant
    }

    fn footer_variant(&self, section: usize) -> RowVariant {
        self.sections[section].footer_variant
    }

    fn item_variant(&self, section: usize, _offset: usize) -> RowVariant {
        self.sections[section].item_variant
    }
}

impl RowFactory for VecSource {
    type View = StubView;

    fn create_header_row(&mut self, variant: RowVariant) -> Option<StubView> {
        Some(StubView {
            kind: RowKind::Header,
            section: 0,
            item_offset: None,
            variant,
        })
    }

    fn create_item_row(&mut self, variant: RowVariant) -> Option<StubView> {
        Some(StubView {
            kind: RowKind::Item,
            section: 0,
            item_offset: None,
            variant,
        })
    }

    fn create_footer_row(&mut self, variant: RowVariant) -> Option<StubView> {
        Some(StubView {
            kind: RowKind::Footer,
            section: 0,
            item_offset: None,
            variant,
        })
    }

    fn create_ghost_header_row(&mut self) -> Option<StubView> {
        Some(StubView {
            kind: RowKind::GhostHeader,
            section: 0,
            item_offset: None,
            variant: RowVariant::DEFAULT,
        })
    }

    fn bind_header_row(&mut self, view: &mut StubView, section: usize, variant: RowVariant) {
        view.section = section;
        view.variant = variant;
    }

    fn bind_item_row(
        &mut self,
        view: &mut StubView,
        section: usize,
        offset: usize,
        variant: RowVariant,
    ) {
        view.section = section;
        view.item_offset = Some(offset);
        view.variant = variant;
    }

    fn bind_footer_row(&mut self, view: &mut StubView, section: usize, variant: RowVariant) {
        view.section = section;
        view.variant = variant;
    }

    fn bind_ghost_header_row(&mut self, view: &mut StubView, section: usize) {
        view.section = section;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_count_matches_specs() {
        let source = VecSource::new(vec![SectionSpec::with_header(3), SectionSpec::bare(2)]);
        assert_eq!(source.section_count(), 2);
        assert_eq!(source.item_count(0), 3);
        assert!(source.has_header(0));
        assert!(!source.has_header(1));
    }

    #[test]
    fn and_footer_sets_flag() {
        let spec = SectionSpec::with_header(1).and_footer();
        assert!(spec.has_header);
        assert!(spec.has_footer);
    }

    #[test]
    fn insert_and_remove_sections() {
        let mut source = VecSource::new(vec![SectionSpec::bare(1)]);
        source.insert_section(0, SectionSpec::with_header(5));
        assert_eq!(source.section_count(), 2);
        assert_eq!(source.item_count(0), 5);

        let removed = source.remove_section(0);
        assert_eq!(removed.item_count, 5);
        assert_eq!(source.section_count(), 1);
    }

    #[test]
    fn item_edits_adjust_counts() {
        let mut source = VecSource::new(vec![SectionSpec::bare(3)]);
        source.insert_items(0, 2);
        assert_eq!(source.item_count(0), 5);
        source.remove_items(0, 4);
        assert_eq!(source.item_count(0), 1);
        source.remove_items(0, 9);
        assert_eq!(source.item_count(0), 0);
    }

    #[test]
    fn factory_binds_section_into_stub_views() {
        let mut source = VecSource::new(vec![SectionSpec::with_header(2)]);
        let variant = RowVariant::new(7).unwrap();

        let mut header = source.create_header_row(variant).unwrap();
        source.bind_header_row(&mut header, 0, variant);
        assert_eq!(header.kind, RowKind::Header);
        assert_eq!(header.section, 0);
        assert_eq!(header.variant.get(), 7);

        let mut item = source.create_item_row(RowVariant::DEFAULT).unwrap();
        source.bind_item_row(&mut item, 0, 1, RowVariant::DEFAULT);
        assert_eq!(item.item_offset, Some(1));
    }
}
