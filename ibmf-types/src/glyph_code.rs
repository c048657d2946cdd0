//! Glyph codes
//!
//! A glyph code is the format specific index of a drawable glyph inside a
//! face. It is distinct from the Unicode code point the glyph represents;
//! mapping between the two is the job of the character map.

/// A 15-bit glyph identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphCode(u16);

/// Strips the diacritical mark from a composite glyph code of a
/// [`Latin`](crate::FontFormat::Latin) font.
pub const LATIN_GLYPH_CODE_MASK: u16 = 0x00FF;

impl GlyphCode {
    /// Returned when a code point has no glyph in the font.
    pub const NO_GLYPH: GlyphCode = GlyphCode(0x7FFF);

    /// Returned for the space character, which is never drawn.
    pub const SPACE: GlyphCode = GlyphCode(0x7FFE);

    /// The largest code that may index a real glyph.
    pub const MAX: GlyphCode = GlyphCode(0x7FFD);

    /// Construct a new `GlyphCode`.
    pub const fn new(raw: u16) -> Self {
        GlyphCode(raw)
    }

    /// The identifier as a u16.
    pub const fn to_u16(self) -> u16 {
        self.0
    }

    /// The identifier as a usize, for indexing glyph arrays.
    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` unless this is one of the two reserved codes.
    pub const fn is_glyph(self) -> bool {
        self.0 <= Self::MAX.0
    }

    /// Returns the base glyph of a composite Latin glyph code.
    pub const fn latin_base(self) -> GlyphCode {
        if self.is_glyph() {
            GlyphCode(self.0 & LATIN_GLYPH_CODE_MASK)
        } else {
            self
        }
    }

    /// Returns the diacritical mark identifier of a composite Latin glyph code.
    ///
    /// Zero means the glyph is drawn without a mark.
    pub const fn latin_mark(self) -> u8 {
        if self.is_glyph() {
            ((self.0 >> 8) & 0x0F) as u8
        } else {
            0
        }
    }
}

impl Default for GlyphCode {
    fn default() -> Self {
        GlyphCode::NO_GLYPH
    }
}

impl From<u16> for GlyphCode {
    fn from(value: u16) -> Self {
        GlyphCode(value)
    }
}

impl core::fmt::Display for GlyphCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            GlyphCode::NO_GLYPH => write!(f, "GC_NONE"),
            GlyphCode::SPACE => write!(f, "GC_SPACE"),
            _ => write!(f, "GC_{}", self.0),
        }
    }
}

crate::newtype_scalar!(GlyphCode, [u8; 2]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_composites() {
        let e_acute = GlyphCode::new(0x0265);
        assert_eq!(e_acute.latin_base(), GlyphCode::new(0x65));
        assert_eq!(e_acute.latin_mark(), 2);
        assert_eq!(GlyphCode::SPACE.latin_base(), GlyphCode::SPACE);
        assert_eq!(GlyphCode::NO_GLYPH.latin_mark(), 0);
    }

    #[test]
    fn reserved_codes() {
        assert!(GlyphCode::new(0).is_glyph());
        assert!(GlyphCode::MAX.is_glyph());
        assert!(!GlyphCode::SPACE.is_glyph());
        assert!(!GlyphCode::NO_GLYPH.is_glyph());
        assert_eq!(GlyphCode::default(), GlyphCode::NO_GLYPH);
    }
}
