//! Building fonts from an external glyph source.
//!
//! Rasterizing outline fonts or parsing glyph dumps happens elsewhere; the
//! results reach the font model as [`ImportedGlyph`]s, keyed by code point.

use std::collections::{BTreeSet, HashMap};

use read_ibmf::{
    bitmap::Bitmap,
    tables::lig_kern::{GlyphKernStep, GlyphLigKern, GlyphLigStep},
    types::{FontFormat, LATIN_GLYPH_COUNT},
    Charmap, ReadError,
};
use write_ibmf::tables::{
    face::{Face, FaceHeader, Glyph, GlyphInfo},
    planes::PlaneTable,
};

use crate::{Error, Fix16, FontContainer, GlyphCode};

/// Placement of an imported bitmap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphMetrics {
    pub horizontal_offset: i8,
    pub vertical_offset: i8,
    pub advance: Fix16,
}

/// A glyph as produced by a [`GlyphSource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportedGlyph {
    pub code_point: u32,
    pub bitmap: Bitmap,
    pub metrics: GlyphMetrics,
    /// `(next, replacement)` code points.
    pub ligatures: Vec<(u32, u32)>,
    /// `(next, kern)` pairs.
    pub kerns: Vec<(u32, Fix16)>,
}

/// Supplies the glyphs of each face of an imported font.
pub trait GlyphSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Renders every glyph the source has for a face.
    fn glyphs(&mut self, face: &FaceHeader) -> Result<Vec<ImportedGlyph>, Self::Error>;
}

impl FontContainer {
    /// Builds a font from the glyphs of `source`, one face per header.
    ///
    /// A UTF32 font covers every code point the source produced for any face;
    /// a Latin font covers its fixed alphabet and ignores other code points.
    /// Lig/kern pairs naming a code point outside the font are dropped.
    pub fn import<S: GlyphSource>(
        format: FontFormat,
        faces: &[FaceHeader],
        source: &mut S,
    ) -> Result<FontContainer, Error> {
        if format == FontFormat::Backup {
            return Err(ReadError::UnsupportedFormat(format).into());
        }
        let imported = faces
            .iter()
            .map(|header| source.glyphs(header))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| Error::Source(Box::new(error)))?;
        let planes = match format {
            FontFormat::Utf32 => {
                let code_points: BTreeSet<u32> = imported
                    .iter()
                    .flatten()
                    .map(|glyph| glyph.code_point)
                    .collect();
                Some(PlaneTable::from_code_points(code_points)?)
            }
            _ => None,
        };
        let (charmap, glyph_count) = match &planes {
            Some(planes) => (Charmap::Utf32(planes.charmap()), planes.glyph_count()),
            None => (Charmap::Latin, LATIN_GLYPH_COUNT as usize),
        };
        let resolver = Resolver {
            charmap,
            glyph_count,
        };
        let faces = faces
            .iter()
            .zip(imported)
            .map(|(header, glyphs)| resolver.face(header, glyphs))
            .collect();
        Ok(FontContainer::from_parts(format, planes, faces))
    }
}

struct Resolver<'a> {
    charmap: Charmap<'a>,
    glyph_count: usize,
}

impl Resolver<'_> {
    /// The glyph holding a code point, if the font has one of its own.
    fn resolve(&self, code_point: u32) -> Option<GlyphCode> {
        let code = self.charmap.map(code_point);
        (code.to_usize() < self.glyph_count).then_some(code)
    }

    fn face(&self, header: &FaceHeader, imported: Vec<ImportedGlyph>) -> Face {
        let mut glyphs: Vec<_> = (0..self.glyph_count as u16)
            .map(|code| Glyph::empty(GlyphCode::new(code)))
            .collect();
        let mut seen = HashMap::new();
        for glyph in imported {
            let Some(code) = self.resolve(glyph.code_point) else {
                log::debug!(
                    "{}pt: no glyph for U+{:04X}, skipped",
                    header.point_size,
                    glyph.code_point
                );
                continue;
            };
            if let Some(previous) = seen.insert(code, glyph.code_point) {
                log::warn!(
                    "{}pt: U+{:04X} replaces U+{previous:04X} as glyph {code}",
                    header.point_size,
                    glyph.code_point
                );
            }
            glyphs[code.to_usize()] = Glyph {
                info: GlyphInfo {
                    horizontal_offset: glyph.metrics.horizontal_offset,
                    vertical_offset: glyph.metrics.vertical_offset,
                    advance: glyph.metrics.advance,
                    main_code: code,
                },
                lig_kern: self.lig_kern(&glyph),
                bitmap: glyph.bitmap,
            };
        }
        Face::new(header.clone(), glyphs)
    }

    fn lig_kern(&self, glyph: &ImportedGlyph) -> GlyphLigKern {
        let ligatures = glyph
            .ligatures
            .iter()
            .filter_map(|(next, replacement)| {
                let step = self.resolve(*next).zip(self.resolve(*replacement));
                if step.is_none() {
                    log::debug!(
                        "dropped ligature U+{:04X} U+{next:04X} -> U+{replacement:04X}",
                        glyph.code_point
                    );
                }
                step.map(|(next, replacement)| GlyphLigStep { next, replacement })
            })
            .collect();
        let kerns = glyph
            .kerns
            .iter()
            .filter_map(|(next, kern)| {
                let step = self.resolve(*next);
                if step.is_none() {
                    log::debug!(
                        "dropped kerning U+{:04X} U+{next:04X}",
                        glyph.code_point
                    );
                }
                step.map(|next| GlyphKernStep { next, kern: *kern })
            })
            .collect();
        GlyphLigKern { ligatures, kerns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LigKern;
    use pretty_assertions::assert_eq;

    struct Ascii;

    #[derive(Debug)]
    struct Unavailable;

    impl std::fmt::Display for Unavailable {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("rasterizer unavailable")
        }
    }

    impl std::error::Error for Unavailable {}

    impl GlyphSource for Ascii {
        type Error = Unavailable;

        fn glyphs(&mut self, face: &FaceHeader) -> Result<Vec<ImportedGlyph>, Unavailable> {
            if face.point_size == 0 {
                return Err(Unavailable);
            }
            let size = face.point_size as usize / 4;
            let row = "#".repeat(size);
            let rows = vec![row.as_str(); size];
            Ok(['A', 'V', '\u{1F600}']
                .into_iter()
                .map(|ch| ImportedGlyph {
                    code_point: ch as u32,
                    bitmap: Bitmap::from_ascii_rows(&rows),
                    metrics: GlyphMetrics {
                        advance: Fix16::from_i32(size as i32 + 1),
                        ..Default::default()
                    },
                    ligatures: vec![],
                    kerns: vec![('V' as u32, Fix16::from_i32(-1)), ('W' as u32, Fix16::ONE)],
                })
                .collect())
        }
    }

    fn headers() -> Vec<FaceHeader> {
        vec![FaceHeader::new(8, 75), FaceHeader::new(12, 75)]
    }

    #[test]
    fn import_utf32() {
        let _ = env_logger::builder().is_test(true).try_init();
        let font = FontContainer::import(FontFormat::Utf32, &headers(), &mut Ascii).unwrap();
        assert_eq!(font.face_count(), 2);
        assert_eq!(font.glyph_count(), 3);
        let a = font.translate('A');
        let v = font.translate('V');
        let smiley = font.translate('\u{1F600}');
        assert_eq!(smiley, GlyphCode::new(2));
        assert_eq!(font.glyph(1, a).unwrap().bitmap.width(), 3);
        // kerning with 'W' was dropped, the font has no such glyph
        assert_eq!(font.glyph(0, a).unwrap().lig_kern.kerns.len(), 1);
        assert_eq!(
            font.lig_kern(0, a, v).unwrap(),
            Some(LigKern::Kern(Fix16::from_i32(-1)))
        );
        let reloaded = FontContainer::load(&font.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded, font);
    }

    #[test]
    fn import_latin() {
        let font = FontContainer::import(FontFormat::Latin, &headers(), &mut Ascii).unwrap();
        assert_eq!(font.face(0).unwrap().glyph_count(), LATIN_GLYPH_COUNT as usize);
        assert_eq!(font.glyph(0, font.translate('V')).unwrap().bitmap.height(), 2);
        // glyphs the source lacks stay empty
        assert!(font.glyph(0, font.translate('W')).unwrap().bitmap.is_empty());
        FontContainer::load(&font.to_bytes().unwrap()).unwrap();
    }

    #[test]
    fn source_errors() {
        let faces = [FaceHeader::new(0, 75)];
        let result = FontContainer::import(FontFormat::Utf32, &faces, &mut Ascii);
        assert!(matches!(result, Err(Error::Source(_))));
        let result = FontContainer::import(FontFormat::Backup, &faces, &mut Ascii);
        assert!(matches!(result, Err(Error::Read(_))));
    }
}
