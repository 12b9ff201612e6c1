//! Row kinds

/// Base kind of a row at some flat position.
///
/// Which kind occupies a local offset within a section is a pure function of
/// the section's structural flags; see [`RowKind::classify`].
///
/// The ghost header is a zero-visual placeholder that reserves the header's
/// layout space inside the normal row stream, letting the real header detach
/// and float (stick) without collapsing the space it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// A section's floating header row.
    Header,
    /// The in-stream placeholder reserving the header's layout space.
    GhostHeader,
    /// An ordinary content row.
    Item,
    /// A section's trailing footer row.
    Footer,
}

impl RowKind {
    /// Classify the row kind at `local_offset` within a section.
    ///
    /// `length` is the section's total row count including header, ghost and
    /// footer. With a header present, offsets 0 and 1 are the header and its
    /// ghost; with a footer present, the final offset is the footer; anything
    /// else is an item.
    ///
    /// # Examples
    /// ```
    /// # use stickylist::model::RowKind;
    /// // header + ghost + 2 items + footer, length 5
    /// assert_eq!(RowKind::classify(true, true, 5, 0), RowKind::Header);
    /// assert_eq!(RowKind::classify(true, true, 5, 1), RowKind::GhostHeader);
    /// assert_eq!(RowKind::classify(true, true, 5, 2), RowKind::Item);
    /// assert_eq!(RowKind::classify(true, true, 5, 4), RowKind::Footer);
    /// ```
    pub fn classify(
        has_header: bool,
        has_footer: bool,
        length: usize,
        local_offset: usize,
    ) -> Self {
        if has_header {
            if local_offset == 0 {
                return Self::Header;
            }
            if local_offset == 1 {
                return Self::GhostHeader;
            }
        }
        if has_footer && local_offset + 1 == length {
            return Self::Footer;
        }
        Self::Item
    }

    /// True for [`RowKind::Header`].
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header)
    }

    /// True for [`RowKind::GhostHeader`].
    pub fn is_ghost(&self) -> bool {
        matches!(self, Self::GhostHeader)
    }
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Header => "header",
            Self::GhostHeader => "ghost",
            Self::Item => "item",
            Self::Footer => "footer",
        };
        f.write_str(name)
    }
}
