//! Mapping between code points and glyph codes.

pub mod latin;

use types::{FontFormat, GlyphCode};

use crate::tables::planes::Planes;

/// The character map of a font.
///
/// Latin fonts use a fixed alphabet; UTF32 fonts carry their own plane and
/// bundle tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charmap<'a> {
    Latin,
    Utf32(Planes<'a>),
}

impl<'a> Charmap<'a> {
    pub fn format(&self) -> FontFormat {
        match self {
            Charmap::Latin => FontFormat::Latin,
            Charmap::Utf32(_) => FontFormat::Utf32,
        }
    }

    /// Maps a code point to a glyph code.
    ///
    /// The result may be one of the reserved codes [`GlyphCode::SPACE`] or
    /// [`GlyphCode::NO_GLYPH`].
    pub fn map(&self, code_point: impl Into<u32>) -> GlyphCode {
        let code_point = code_point.into();
        match self {
            Charmap::Latin => latin::glyph_code(code_point),
            Charmap::Utf32(planes) => planes.glyph_code(code_point),
        }
    }

    /// Maps a glyph code back to the code point it renders.
    pub fn code_point(&self, glyph: GlyphCode) -> Option<u32> {
        match self {
            Charmap::Latin => latin::code_point(glyph),
            Charmap::Utf32(planes) => planes.code_point(glyph),
        }
    }

    /// Returns the glyph code used to look up metrics and bitmaps.
    ///
    /// For Latin fonts this strips the diacritical mark of a composite code.
    pub fn base_glyph(&self, glyph: GlyphCode) -> GlyphCode {
        match self {
            Charmap::Latin => glyph.latin_base(),
            Charmap::Utf32(_) => glyph,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::planes::{CodePointBundle, Plane};

    #[test]
    fn map_chars() {
        let planes = [Plane::new(0, 1, 0), Plane::new(1, 0, 10), Plane::new(1, 0, 10), Plane::new(1, 0, 10)];
        let bundles = [CodePointBundle::new(0x30, 0x39)];
        let utf32 = Charmap::Utf32(Planes::new(&planes, &bundles));
        assert_eq!(utf32.map('7'), GlyphCode::new(7));
        assert_eq!(utf32.map('é'), GlyphCode::NO_GLYPH);
        assert_eq!(utf32.base_glyph(GlyphCode::new(0x203)), GlyphCode::new(0x203));

        let latin = Charmap::Latin;
        assert_eq!(latin.map('é'), GlyphCode::new(0x0265));
        assert_eq!(latin.base_glyph(latin.map('é')), GlyphCode::new(0x65));
        assert_eq!(latin.format(), FontFormat::Latin);
    }
}
