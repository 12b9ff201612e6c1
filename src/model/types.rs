//! Core coordinate newtypes

/// Pixel distance in viewport-local coordinates.
///
/// Signed: rows scrolled partially above the viewport have negative tops.
pub type Px = i32;

/// Flat adapter position: index into the single linear sequence of all rows
/// across all sections (header, ghost header, items, footer interleaved).
/// 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FlatPos(usize);

impl FlatPos {
    /// Create a new FlatPos from a raw value.
    pub fn new(position: usize) -> Self {
        Self(position)
    }

    /// Get the raw usize value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Next flat position.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Previous flat position, if one exists.
    pub fn prev(&self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl From<usize> for FlatPos {
    fn from(position: usize) -> Self {
        Self(position)
    }
}

impl std::fmt::Display for FlatPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a row variant is outside the supported `[0, 255]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("row variant must be in [0, 255] (got {0})")]
pub struct InvalidVariant(pub u32);

/// Application-defined row variant in `[0, 255]`.
///
/// Data sources tag each header/item/footer with a variant so pool
/// implementations can vend differently-inflated views per variant. The range
/// limit is a validated precondition; callers passing a wider integer go
/// through [`RowVariant::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RowVariant(u8);

impl RowVariant {
    /// The default variant (0) used by sources that don't distinguish rows.
    pub const DEFAULT: Self = Self(0);

    /// Smart constructor validating the `[0, 255]` range.
    pub fn new(variant: u32) -> Result<Self, InvalidVariant> {
        u8::try_from(variant)
            .map(Self)
            .map_err(|_| InvalidVariant(variant))
    }

    /// Get the raw u8 value.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl From<u8> for RowVariant {
    fn from(variant: u8) -> Self {
        Self(variant)
    }
}

/// Viewport geometry in pixels.
///
/// Local coordinates: 0 is the viewport's top edge, `height` its bottom edge.
/// `top_padding` is the sticky target: pinned headers rest at this offset and
/// the first row of an unscrolled list starts here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Height in pixels.
    pub height: Px,
    /// Inset from the top edge applied to content and pinned headers.
    pub top_padding: Px,
}

impl Viewport {
    /// Create a new viewport.
    pub fn new(height: Px, top_padding: Px) -> Self {
        Self {
            height,
            top_padding,
        }
    }

    /// The y coordinate pinned headers stick to.
    pub fn sticky_top(&self) -> Px {
        self.top_padding
    }

    /// The y coordinate of the bottom edge.
    pub fn bottom_edge(&self) -> Px {
        self.height
    }
}
