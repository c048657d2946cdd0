//! The editable font model.

use std::io::Write;

use read_ibmf::{
    bitmap::Bitmap,
    tables::lig_kern::GlyphLigKern,
    types::{FontFormat, LATIN_GLYPH_COUNT},
    Charmap, FontRef, ReadError,
};
use write_ibmf::{
    from_obj::{FromObjRef, TryFromObjRef},
    tables::{
        face::{Face, FaceHeader, Glyph, GlyphInfo},
        planes::PlaneTable,
    },
    FontBuilder,
};

use crate::{Error, Fix16, GlyphCode};

/// The outcome of a lig/kern lookup between two glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LigKern {
    /// The pair is replaced by this glyph.
    Ligature(GlyphCode),
    /// The second glyph is moved by this many pixels.
    Kern(Fix16),
}

/// An IBMF font, fully decoded.
///
/// Every glyph's bitmap and lig/kern view is held in its decoded form; edits
/// replace them in place. The derived data of the file (compressed packets
/// and the shared lig/kern program of each face) is only rebuilt by
/// [`save`](Self::save) and [`to_bytes`](Self::to_bytes).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontContainer {
    format: FontFormat,
    planes: Option<PlaneTable>,
    faces: Vec<Face>,
}

impl FontContainer {
    /// An empty font of the given format.
    pub fn new(format: FontFormat) -> Self {
        FontContainer {
            format,
            planes: None,
            faces: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        format: FontFormat,
        planes: Option<PlaneTable>,
        faces: Vec<Face>,
    ) -> Self {
        FontContainer {
            format,
            planes,
            faces,
        }
    }

    /// Parses and decodes a font file.
    ///
    /// Backup files are loaded with [`BackupSet::load`](crate::BackupSet::load)
    /// instead.
    pub fn load(data: &[u8]) -> Result<Self, Error> {
        let font = FontRef::new(data)?;
        if font.format() == FontFormat::Backup {
            return Err(ReadError::UnsupportedFormat(FontFormat::Backup).into());
        }
        let faces = font
            .faces()
            .map(|face| Face::try_from_obj_ref(&face?))
            .collect::<Result<Vec<Face>, ReadError>>()?;
        log::debug!(
            "loaded {} font with {} faces",
            font.format(),
            faces.len()
        );
        Ok(FontContainer {
            format: font.format(),
            planes: font.planes().map(|planes| PlaneTable::from_obj_ref(&planes)),
            faces,
        })
    }

    /// Compiles the font to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut builder = FontBuilder::new(self.format);
        if let Some(planes) = &self.planes {
            builder.set_planes(planes.clone())?;
        }
        for face in &self.faces {
            builder.add_face(face)?;
        }
        Ok(builder.build())
    }

    /// Compiles the font and writes it out.
    ///
    /// Nothing is written unless every face compiles.
    pub fn save(&self, out: &mut impl Write) -> Result<(), Error> {
        let bytes = self.to_bytes()?;
        out.write_all(&bytes)?;
        Ok(())
    }

    pub fn format(&self) -> FontFormat {
        self.format
    }

    pub fn planes(&self) -> Option<&PlaneTable> {
        self.planes.as_ref()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// The number of glyphs in each face.
    pub fn glyph_count(&self) -> usize {
        match (self.format, &self.planes) {
            (FontFormat::Latin, _) => LATIN_GLYPH_COUNT as usize,
            (_, Some(planes)) => planes.glyph_count(),
            _ => self.faces.first().map_or(0, Face::glyph_count),
        }
    }

    pub fn face(&self, face: usize) -> Result<&Face, Error> {
        self.faces.get(face).ok_or(Error::FaceOutOfRange(face))
    }

    fn face_mut(&mut self, face: usize) -> Result<&mut Face, Error> {
        self.faces.get_mut(face).ok_or(Error::FaceOutOfRange(face))
    }

    pub fn face_header(&self, face: usize) -> Result<&FaceHeader, Error> {
        self.face(face).map(|f| &f.header)
    }

    /// The glyph behind a glyph code; composite Latin codes resolve to their
    /// base glyph.
    pub fn glyph(&self, face: usize, glyph: GlyphCode) -> Result<&Glyph, Error> {
        let code = self.base_glyph(glyph);
        self.face(face)?
            .glyph(code)
            .ok_or(Error::GlyphOutOfRange { face, glyph })
    }

    fn glyph_mut(&mut self, face: usize, glyph: GlyphCode) -> Result<&mut Glyph, Error> {
        let code = self.base_glyph(glyph);
        self.face_mut(face)?
            .glyphs
            .get_mut(code.to_usize())
            .ok_or(Error::GlyphOutOfRange { face, glyph })
    }

    /// Replaces a glyph's metrics, bitmap and lig/kern view.
    pub fn save_glyph(
        &mut self,
        face: usize,
        glyph: GlyphCode,
        info: GlyphInfo,
        bitmap: Bitmap,
        lig_kern: GlyphLigKern,
    ) -> Result<(), Error> {
        *self.glyph_mut(face, glyph)? = Glyph {
            info,
            bitmap,
            lig_kern,
        };
        Ok(())
    }

    pub fn save_face_header(&mut self, face: usize, header: FaceHeader) -> Result<(), Error> {
        self.face_mut(face)?.header = header;
        Ok(())
    }

    /// Drops every face and the code point tables.
    pub fn clear(&mut self) {
        self.faces.clear();
        self.planes = None;
    }

    /// The character map, if the font has one.
    pub fn charmap(&self) -> Option<Charmap<'_>> {
        match (self.format, &self.planes) {
            (FontFormat::Latin, _) => Some(Charmap::Latin),
            (FontFormat::Utf32, Some(planes)) => Some(Charmap::Utf32(planes.charmap())),
            _ => None,
        }
    }

    /// Maps a code point to a glyph code.
    pub fn translate(&self, code_point: impl Into<u32>) -> GlyphCode {
        self.charmap()
            .map_or(GlyphCode::NO_GLYPH, |charmap| charmap.map(code_point))
    }

    /// Maps a glyph code back to its code point.
    pub fn code_point(&self, glyph: GlyphCode) -> Option<u32> {
        self.charmap()?.code_point(glyph)
    }

    fn base_glyph(&self, glyph: GlyphCode) -> GlyphCode {
        match self.format {
            FontFormat::Latin => glyph.latin_base(),
            _ => glyph,
        }
    }

    /// Looks up the ligature or kerning between two consecutive glyphs.
    ///
    /// The first glyph's own view is used, or, when it has none, the view of
    /// its main glyph: accented letters kern like their base letter. The
    /// second glyph is matched through its main code.
    pub fn lig_kern(
        &self,
        face: usize,
        first: GlyphCode,
        second: GlyphCode,
    ) -> Result<Option<LigKern>, Error> {
        let glyph = self.glyph(face, first)?;
        let main = glyph.info.main_code;
        let view = if glyph.lig_kern.is_empty() && main != self.base_glyph(first) {
            &self.glyph(face, main)?.lig_kern
        } else {
            &glyph.lig_kern
        };
        let next = self.base_glyph(self.glyph(face, second)?.info.main_code);
        if let Some(replacement) = view.ligature(next) {
            return Ok(Some(LigKern::Ligature(replacement)));
        }
        Ok(view.kern(next).map(LigKern::Kern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use read_ibmf::tables::lig_kern::{GlyphKernStep, GlyphLigStep};

    fn latin_font() -> FontContainer {
        let glyphs = (0..LATIN_GLYPH_COUNT)
            .map(|code| Glyph::empty(GlyphCode::new(code)))
            .collect();
        let mut font = FontContainer::new(FontFormat::Latin);
        font.faces.push(Face::new(FaceHeader::new(10, 75), glyphs));
        font
    }

    fn kern(next: GlyphCode, pixels: i32) -> GlyphKernStep {
        GlyphKernStep {
            next,
            kern: Fix16::from_i32(pixels),
        }
    }

    #[test]
    fn composite_glyphs_share_kerning() {
        let mut font = latin_font();
        let a = font.translate('A');
        let v = font.translate('V');
        let a_acute = font.translate('\u{C1}');
        assert_eq!(a_acute.latin_base(), a);
        font.glyph_mut(0, a).unwrap().lig_kern.kerns.push(kern(v, -1));
        let expected = Some(LigKern::Kern(Fix16::from_i32(-1)));
        assert_eq!(font.lig_kern(0, a, v).unwrap(), expected);
        // the accent is stripped from both sides
        assert_eq!(font.lig_kern(0, a_acute, v).unwrap(), expected);
        assert_eq!(font.lig_kern(0, v, a).unwrap(), None);
    }

    #[test]
    fn main_code_inherits_kerning() {
        let mut font = latin_font();
        let (o, oe, t) = (font.translate('O'), font.translate('\u{152}'), font.translate('T'));
        font.glyph_mut(0, o).unwrap().lig_kern.kerns.push(kern(t, -2));
        font.glyph_mut(0, oe).unwrap().info.main_code = o;
        assert_eq!(
            font.lig_kern(0, oe, t).unwrap(),
            Some(LigKern::Kern(Fix16::from_i32(-2)))
        );
        // the second glyph is matched through its main code as well
        font.glyph_mut(0, t).unwrap().info.main_code = o;
        assert_eq!(font.lig_kern(0, o, t).unwrap(), None);
    }

    #[test]
    fn ligature_before_kern() {
        let mut font = latin_font();
        let (f, i, fi) = (font.translate('f'), font.translate('i'), font.translate('\u{FB01}'));
        let glyph = font.glyph_mut(0, f).unwrap();
        glyph.lig_kern.kerns.push(kern(i, 1));
        glyph.lig_kern.ligatures.push(GlyphLigStep {
            next: i,
            replacement: fi,
        });
        assert_eq!(font.lig_kern(0, f, i).unwrap(), Some(LigKern::Ligature(fi)));
    }

    #[test]
    fn edits_and_ranges() {
        let mut font = latin_font();
        let x = font.translate('x');
        let info = GlyphInfo {
            advance: Fix16::from_i32(6),
            ..GlyphInfo::new(x)
        };
        let bitmap = Bitmap::from_ascii_rows(&["#"]);
        font.save_glyph(0, x, info.clone(), bitmap, GlyphLigKern::default())
            .unwrap();
        assert_eq!(font.glyph(0, x).unwrap().info, info);
        assert!(matches!(
            font.save_glyph(1, x, info, Bitmap::default(), GlyphLigKern::default()),
            Err(Error::FaceOutOfRange(1))
        ));
        assert!(matches!(
            font.glyph(0, GlyphCode::new(500)),
            Err(Error::GlyphOutOfRange { face: 0, .. })
        ));
        let mut header = font.face_header(0).unwrap().clone();
        header.line_height = 14;
        font.save_face_header(0, header).unwrap();
        assert_eq!(font.face_header(0).unwrap().line_height, 14);
        font.clear();
        assert_eq!(font.face_count(), 0);
        assert!(font.face_header(0).is_err());
    }

    #[test]
    fn load_rejects_backups() {
        let data = write_ibmf::FontBuilder::new(FontFormat::Backup).build();
        assert!(matches!(
            FontContainer::load(&data),
            Err(Error::Read(ReadError::UnsupportedFormat(FontFormat::Backup)))
        ));
    }
}
