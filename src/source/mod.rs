//! Upstream data-source capabilities.
//!
//! The engine and indexer consume the backing data through two traits:
//! - [`SectionSource`] - structure queries (counts, header/footer flags,
//!   variants), the only capability the [`crate::index::SectionIndexer`] needs
//! - [`RowFactory`] - view creation/binding callbacks with an associated
//!   `View` type, consumed by pool implementations rather than by the engine
//!
//! [`VecSource`] is the in-memory implementation used by tests, benchmarks and
//! the stress demo.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::RowVariant;

pub mod vec_source;

pub use vec_source::{SectionSpec, VecSource};

/// Structure queries against the backing data.
///
/// This is the capability contract the section index is rebuilt from. All
/// methods take a section index the caller has validated against
/// [`SectionSource::section_count`]; implementations may panic on wild
/// indices (the indexer never passes one).
pub trait SectionSource {
    /// Number of sections.
    fn section_count(&self) -> usize;

    /// Items in `section`, excluding header/ghost/footer.
    fn item_count(&self, section: usize) -> usize;

    /// Whether `section` begins with a header.
    fn has_header(&self, section: usize) -> bool;

    /// Whether `section` ends with a footer.
    fn has_footer(&self, section: usize) -> bool;

    /// Application variant for `section`'s header view.
    fn header_variant(&self, _section: usize) -> RowVariant {
        RowVariant::DEFAULT
    }

    /// Application variant for `section`'s footer view.
    fn footer_variant(&self, _section: usize) -> RowVariant {
        RowVariant::DEFAULT
    }

    /// Application variant for the item at `offset` within `section`.
    fn item_variant(&self, _section: usize, _offset: usize) -> RowVariant {
        RowVariant::DEFAULT
    }
}

/// View creation and binding callbacks.
///
/// Pool implementations vend views through this trait; the layout engine
/// itself never touches it (it only sees [`crate::pool::ViewId`]s). A
/// creation callback returning `None` is a capability contract violation
/// that pools surface as [`crate::model::PoolError::ViewCreation`].
pub trait RowFactory: SectionSource {
    /// The host toolkit's view type.
    type View;

    /// Create a header view for `variant`.
    fn create_header_row(&mut self, variant: RowVariant) -> Option<Self::View>;

    /// Create an item view for `variant`.
    fn create_item_row(&mut self, variant: RowVariant) -> Option<Self::View>;

    /// Create a footer view for `variant`.
    fn create_footer_row(&mut self, variant: RowVariant) -> Option<Self::View>;

    /// Create the zero-visual ghost placeholder view.
    fn create_ghost_header_row(&mut self) -> Option<Self::View>;

    /// Bind `section`'s header content into `view`.
    fn bind_header_row(&mut self, view: &mut Self::View, section: usize, variant: RowVariant);

    /// Bind the item at `(section, offset)` into `view`.
    fn bind_item_row(
        &mut self,
        view: &mut Self::View,
        section: usize,
        offset: usize,
        variant: RowVariant,
    );

    /// Bind `section`'s footer content into `view`.
    fn bind_footer_row(&mut self, view: &mut Self::View, section: usize, variant: RowVariant);

    /// Bind the ghost placeholder for `section` into `view`.
    fn bind_ghost_header_row(&mut self, view: &mut Self::View, section: usize);
}

// The indexer and the pool both consume the same backing source; everything
// is single-threaded, so a shared Rc<RefCell<_>> handle satisfies both
// capabilities.
impl<S: SectionSource> SectionSource for Rc<RefCell<S>> {
    fn section_count(&self) -> usize {
        self.borrow().section_count()
    }

    fn item_count(&self, section: usize) -> usize {
        self.borrow().item_count(section)
    }

    fn has_header(&self, section: usize) -> bool {
        self.borrow().has_header(section)
    }

    fn has_footer(&self, section: usize) -> bool {
        self.borrow().has_footer(section)
    }

    fn header_variant(&self, section: usize) -> RowVariant {
        self.borrow().header_variant(section)
    }

    fn footer_variant(&self, section: usize) -> RowVariant {
        self.borrow().footer_variant(section)
    }

    fn item_variant(&self, section: usize, offset: usize) -> RowVariant {
        self.borrow().item_variant(section, offset)
    }
}

impl<F: RowFactory> RowFactory for Rc<RefCell<F>> {
    type View = F::View;

    fn create_header_row(&mut self, variant: RowVariant) -> Option<Self::View> {
        self.borrow_mut().create_header_row(variant)
    }

    fn create_item_row(&mut self, variant: RowVariant) -> Option<Self::View> {
        self.borrow_mut().create_item_row(variant)
    }

    fn create_footer_row(&mut self, variant: RowVariant) -> Option<Self::View> {
        self.borrow_mut().create_footer_row(variant)
    }

    fn create_ghost_header_row(&mut self) -> Option<Self::View> {
        self.borrow_mut().create_ghost_header_row()
    }

    fn bind_header_row(&mut self, view: &mut Self::View, section: usize, variant: RowVariant) {
        self.borrow_mut().bind_header_row(view, section, variant);
    }

    fn bind_item_row(
        &mut self,
        view: &mut Self::View,
        section: usize,
        offset: usize,
        variant: RowVariant,
    ) {
        self.borrow_mut().bind_item_row(view, section, offset, variant);
    }

    fn bind_footer_row(&mut self, view: &mut Self::View, section: usize, variant: RowVariant) {
        self.borrow_mut().bind_footer_row(view, section, variant);
    }

    fn bind_ghost_header_row(&mut self, view: &mut Self::View, section: usize) {
        self.borrow_mut().bind_ghost_header_row(view, section);
    }
}
