//! A builder for complete IBMF files

use std::io::Write;

use read::tables::preamble::Preamble;
use types::{FontFormat, LATIN_GLYPH_COUNT};

use crate::{
    error::Error,
    tables::{
        backup::BackupFace,
        face::Face,
        planes::{PlaneTable, PlaneTableError},
    },
    validate::{Validate, ValidationCtx},
    write::{dump_table, FontWrite, TableWriter},
};

/// Build a font file from a list of faces.
///
/// Faces are compiled as they are added, so errors are reported by
/// [`add_face`](Self::add_face) and [`build`](Self::build) cannot fail.
#[derive(Debug, Clone)]
pub struct FontBuilder {
    format: FontFormat,
    planes: Option<PlaneTable>,
    faces: Vec<CompiledFaceData>,
}

#[derive(Debug, Clone)]
struct CompiledFaceData {
    point_size: u8,
    glyph_count: usize,
    bytes: Vec<u8>,
}

impl FontWrite for Preamble {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_slice(&self.marker);
        self.face_count.write_into(writer);
        self.bits.write_into(writer);
    }
}

impl FontBuilder {
    pub fn new(format: FontFormat) -> Self {
        FontBuilder {
            format,
            planes: None,
            faces: Vec::new(),
        }
    }

    pub fn format(&self) -> FontFormat {
        self.format
    }

    /// Sets the code points of a UTF32 font; glyph codes follow their order.
    pub fn set_code_points(
        &mut self,
        code_points: impl IntoIterator<Item = u32>,
    ) -> Result<&mut Self, PlaneTableError> {
        self.planes = Some(PlaneTable::from_code_points(code_points)?);
        Ok(self)
    }

    /// Sets hand-built planes and bundles for a UTF32 font.
    ///
    /// The tables must map every glyph code back to itself; a table that
    /// readers would reject is refused here.
    pub fn set_planes(&mut self, planes: PlaneTable) -> Result<&mut Self, Error> {
        planes.validate()?;
        self.planes = Some(planes);
        Ok(self)
    }

    /// Compiles a face and appends it to the font.
    pub fn add_face(&mut self, face: &Face) -> Result<&mut Self, Error> {
        let glyph_count = face.glyph_count();
        let mut ctx = ValidationCtx::default();
        ctx.in_table("FontBuilder", |ctx| {
            self.check_face_count(ctx);
            let expected = match self.format {
                FontFormat::Latin => Some(LATIN_GLYPH_COUNT as usize),
                FontFormat::Utf32 => {
                    let planes = self.planes.as_ref().map(PlaneTable::glyph_count);
                    if planes.is_none() {
                        ctx.report("code points must be set before adding faces");
                    }
                    planes
                }
                FontFormat::Backup => {
                    ctx.report("backup fonts hold backup faces");
                    None
                }
            };
            if let Some(expected) = expected.filter(|count| *count != glyph_count) {
                ctx.report(format!("face has {glyph_count} glyphs, expected {expected}"));
            }
        });
        ctx.into_result()?;
        let bytes = dump_table(&face.compile()?)?;
        Ok(self.push_face(face.header.point_size, glyph_count, bytes))
    }

    /// Compiles a backup face and appends it to a backup font.
    pub fn add_backup_face(&mut self, face: &BackupFace) -> Result<&mut Self, Error> {
        let mut ctx = ValidationCtx::default();
        ctx.in_table("FontBuilder", |ctx| {
            self.check_face_count(ctx);
            if self.format != FontFormat::Backup {
                ctx.report(format!("{} fonts cannot hold backup faces", self.format));
            }
        });
        ctx.into_result()?;
        let bytes = dump_table(&face.compile()?)?;
        Ok(self.push_face(face.header.point_size, face.len(), bytes))
    }

    fn check_face_count(&self, ctx: &mut ValidationCtx) {
        if self.faces.len() >= u8::MAX as usize {
            ctx.report("a font holds at most 255 faces");
        }
    }

    fn push_face(&mut self, point_size: u8, glyph_count: usize, bytes: Vec<u8>) -> &mut Self {
        log::debug!(
            "face {}: {point_size}pt, {glyph_count} glyphs, {} bytes",
            self.faces.len(),
            bytes.len()
        );
        self.faces.push(CompiledFaceData {
            point_size,
            glyph_count,
            bytes,
        });
        self
    }

    /// The number of faces added so far.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Assembles the preamble, the offset table and all faces.
    pub fn build(&self) -> Vec<u8> {
        let mut writer = TableWriter::default();
        Preamble::new(self.faces.len() as u8, self.format).write_into(&mut writer);
        for face in &self.faces {
            face.point_size.write_into(&mut writer);
        }
        writer.pad_to_4();
        let offsets_start = writer.len();
        for _ in &self.faces {
            0u32.write_into(&mut writer);
        }
        if self.format == FontFormat::Utf32 {
            match &self.planes {
                Some(planes) => planes.write_into(&mut writer),
                None => PlaneTable::default().write_into(&mut writer),
            }
        }
        for (ix, face) in self.faces.iter().enumerate() {
            writer.patch_u32(offsets_start + ix * 4, writer.len() as u32);
            writer.write_slice(&face.bytes);
        }
        let glyphs: usize = self.faces.iter().map(|face| face.glyph_count).sum();
        log::debug!(
            "built {} font: {} faces, {glyphs} glyphs, {} bytes",
            self.format,
            self.faces.len(),
            writer.len()
        );
        writer.into_data()
    }

    /// Builds the font and writes it out.
    pub fn write_to(&self, out: &mut impl Write) -> Result<(), Error> {
        out.write_all(&self.build())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{
        backup::BackupGlyph,
        face::{FaceHeader, Glyph},
    };
    use pretty_assertions::assert_eq;
    use read::{
        bitmap::Bitmap,
        tables::planes::{CodePointBundle, Plane},
        FontRef, ReadError,
    };
    use types::GlyphCode;

    fn face(point_size: u8, glyph_count: u16) -> Face {
        let glyphs = (0..glyph_count)
            .map(|code| Glyph {
                bitmap: Bitmap::from_ascii_rows(&["#.", ".#"]),
                ..Glyph::empty(GlyphCode::new(code))
            })
            .collect();
        Face::new(FaceHeader::new(point_size, 75), glyphs)
    }

    #[test]
    fn utf32_font() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut builder = FontBuilder::new(FontFormat::Utf32);
        builder.set_code_points([0x41, 0x42, 0x1F600]).unwrap();
        builder.add_face(&face(10, 3)).unwrap();
        builder.add_face(&face(12, 3)).unwrap();
        let bytes = builder.build();
        assert_eq!(&bytes[..4], b"IBMF");
        let font = FontRef::new(&bytes).unwrap();
        assert_eq!(font.format(), FontFormat::Utf32);
        assert_eq!(font.point_sizes(), &[10, 12]);
        let charmap = font.charmap().unwrap();
        assert_eq!(charmap.map(0x1F600u32), GlyphCode::new(2));
        let second = font.face(1).unwrap();
        assert_eq!(second.header().point_size(), 12);
        assert_eq!(
            second.bitmap(GlyphCode::new(2)).unwrap(),
            Bitmap::from_ascii_rows(&["#.", ".#"])
        );
    }

    #[test]
    fn latin_font() {
        let mut builder = FontBuilder::new(FontFormat::Latin);
        assert!(builder.add_face(&face(10, 3)).is_err());
        builder.add_face(&face(10, LATIN_GLYPH_COUNT)).unwrap();
        let bytes = builder.build();
        let font = FontRef::new(&bytes).unwrap();
        assert_eq!(font.face(0).unwrap().glyph_count(), LATIN_GLYPH_COUNT);
        assert!(font.planes().is_none());
    }

    #[test]
    fn glyph_counts_must_agree() {
        let mut builder = FontBuilder::new(FontFormat::Utf32);
        assert!(builder.add_face(&face(10, 2)).is_err(), "no code points");
        builder.set_code_points([0x41, 0x42]).unwrap();
        builder.add_face(&face(10, 2)).unwrap();
        let Err(Error::ValidationFailed(report)) = builder.add_face(&face(12, 3)) else {
            panic!("expected a validation error");
        };
        assert!(report.to_string().contains("expected 2"));
        assert_eq!(builder.face_count(), 1);
    }

    #[test]
    fn overlapping_bundles_are_refused() {
        let mut planes = PlaneTable::from_code_points(0x41..0x47).unwrap();
        planes.planes[0] = Plane::new(0, 2, 0);
        planes.bundles = vec![
            CodePointBundle::new(0x41, 0x43),
            CodePointBundle::new(0x42, 0x44),
        ];
        let mut builder = FontBuilder::new(FontFormat::Utf32);
        let Err(Error::ValidationFailed(report)) = builder.set_planes(planes) else {
            panic!("expected a validation error");
        };
        assert!(report.to_string().contains("PlaneTable"));
        // nothing was kept, so faces cannot be added either
        assert!(builder.add_face(&face(10, 6)).is_err());

        let planes = PlaneTable::from_code_points([0x41, 0x42, 0x2022]).unwrap();
        builder.set_planes(planes).unwrap().add_face(&face(10, 3)).unwrap();
        let bytes = builder.build();
        let font = FontRef::new(&bytes).unwrap();
        assert_eq!(font.charmap().unwrap().map(0x2022u32), GlyphCode::new(2));
    }

    #[test]
    fn backup_font() {
        let mut backup = BackupFace::new(FaceHeader::new(10, 75));
        backup.insert(
            0x41,
            BackupGlyph {
                bitmap: Bitmap::from_ascii_rows(&["#"]),
                ..Default::default()
            },
        );
        let mut builder = FontBuilder::new(FontFormat::Backup);
        assert!(builder.add_face(&face(10, 1)).is_err());
        builder.add_backup_face(&backup).unwrap();
        builder.add_backup_face(&BackupFace::new(FaceHeader::new(12, 75))).unwrap();
        let bytes = builder.build();
        let font = FontRef::new(&bytes).unwrap();
        assert!(matches!(font.face(0), Err(ReadError::UnsupportedFormat(_))));
        assert_eq!(font.backup_face(0).unwrap().entries().len(), 1);
        assert!(font.backup_face(1).unwrap().entries().is_empty());

        let mut regular = FontBuilder::new(FontFormat::Latin);
        assert!(regular.add_backup_face(&backup).is_err());
    }

    #[test]
    fn write_to_writer() {
        let mut builder = FontBuilder::new(FontFormat::Utf32);
        builder.set_code_points([0x2022]).unwrap();
        builder.add_face(&face(8, 1)).unwrap();
        let mut out = Vec::new();
        builder.write_to(&mut out).unwrap();
        assert_eq!(out, builder.build());
        // preamble, one point size and padding, one offset, planes, one bundle
        assert_eq!(font_offset(&out), 6 + 2 + 4 + 24 + 4);
    }

    fn font_offset(bytes: &[u8]) -> usize {
        u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize
    }
}
