//! The entry point for reading IBMF files.

use types::FontFormat;

use crate::{
    charmap::Charmap,
    tables::{
        backup::BackupFace,
        face::Face,
        planes::Planes,
        preamble::{FileHeader, Preamble},
    },
    FontData, FontRead, ReadError,
};

/// A reference to the contents of an IBMF file.
///
/// Construction walks the whole file once, checking that every face starts
/// where the offset table says, that faces agree on their glyph count and,
/// for UTF32 fonts, that the plane tables map glyph codes one to one.
/// Accessors only re-read the face they are asked for.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    header: FileHeader<'a>,
    planes: Option<Planes<'a>>,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        Self::read(FontData::new(data))
    }

    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    pub fn preamble(&self) -> &'a Preamble {
        self.header.preamble()
    }

    pub fn file_header(&self) -> &FileHeader<'a> {
        &self.header
    }

    pub fn format(&self) -> FontFormat {
        self.header.format()
    }

    pub fn face_count(&self) -> usize {
        self.header.face_count()
    }

    pub fn point_sizes(&self) -> &'a [u8] {
        self.header.point_sizes()
    }

    /// The plane tables of a UTF32 font.
    pub fn planes(&self) -> Option<Planes<'a>> {
        self.planes
    }

    /// The character map, unavailable for backup files.
    pub fn charmap(&self) -> Result<Charmap<'a>, ReadError> {
        match (self.format(), self.planes) {
            (FontFormat::Latin, _) => Ok(Charmap::Latin),
            (FontFormat::Utf32, Some(planes)) => Ok(Charmap::Utf32(planes)),
            (format, _) => Err(ReadError::UnsupportedFormat(format)),
        }
    }

    fn face_data(&self, index: usize) -> Result<FontData<'a>, ReadError> {
        let offset = self
            .header
            .face_offset(index)
            .ok_or(ReadError::InvalidFaceIndex(index))?;
        self.data.split_off(offset).ok_or(ReadError::OutOfBounds)
    }

    /// The face at `index`.
    pub fn face(&self, index: usize) -> Result<Face<'a>, ReadError> {
        if self.format() == FontFormat::Backup {
            return Err(ReadError::UnsupportedFormat(FontFormat::Backup));
        }
        Face::read(self.face_data(index)?)
    }

    /// Iterates over all faces.
    pub fn faces(&self) -> impl Iterator<Item = Result<Face<'a>, ReadError>> + '_ {
        (0..self.face_count()).map(|ix| self.face(ix))
    }

    /// The backed up glyphs of the face at `index`, for backup files.
    pub fn backup_face(&self, index: usize) -> Result<BackupFace<'a>, ReadError> {
        if self.format() != FontFormat::Backup {
            return Err(ReadError::UnsupportedFormat(self.format()));
        }
        BackupFace::read(self.face_data(index)?)
    }
}

impl<'a> FontRead<'a> for FontRef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let header = FileHeader::read_with_cursor(&mut cursor)?;
        let format = header.format();
        let planes = match format {
            FontFormat::Utf32 => Some(Planes::read_with_cursor(&mut cursor)?),
            _ => None,
        };
        let mut glyph_count = None;
        for (ix, point_size) in header.point_sizes().iter().enumerate() {
            let expected = cursor.position();
            let actual = header
                .face_offset(ix)
                .ok_or(ReadError::InvalidFaceIndex(ix))?;
            if expected != actual {
                return Err(ReadError::OffsetMismatch { expected, actual });
            }
            let face_header = if format == FontFormat::Backup {
                let face = BackupFace::read_with_cursor(&mut cursor)?;
                face.header()
            } else {
                let face = Face::read_with_cursor(&mut cursor)?;
                face.header()
            };
            if face_header.point_size() != *point_size {
                log::warn!(
                    "face {ix}: header point size {} differs from preamble {point_size}",
                    face_header.point_size()
                );
            }
            if !format.has_uniform_glyph_count() {
                continue;
            }
            let actual = face_header.glyph_count();
            let expected = match (format, glyph_count) {
                (_, Some(count)) => count,
                (FontFormat::Latin, None) => types::LATIN_GLYPH_COUNT,
                (_, None) => actual,
            };
            if actual != expected {
                return Err(ReadError::GlyphCountMismatch {
                    face: ix,
                    expected,
                    actual,
                });
            }
            glyph_count = Some(actual);
        }
        if let (Some(planes), Some(count)) = (planes, glyph_count) {
            planes.check_round_trip(count)?;
        }
        Ok(FontRef {
            data,
            header,
            planes,
        })
    }
}

impl std::fmt::Debug for FontRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRef")
            .field("format", &self.format())
            .field("point_sizes", &self.point_sizes())
            .finish_non_exhaustive()
    }
}
