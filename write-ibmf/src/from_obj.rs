//! Conversions from parsed font data to their owned, editable equivalents

use read::{
    rle,
    tables::{backup as read_backup, face as read_face, planes::Planes},
    ReadError,
};
use types::GlyphCode;

use crate::tables::{
    backup::{BackupFace, BackupGlyph},
    face::{Face, FaceHeader, Glyph, GlyphInfo},
    planes::PlaneTable,
};

/// A conversion from a parsed record to an owned one.
pub trait FromObjRef<T: ?Sized>: Sized {
    fn from_obj_ref(from: &T) -> Self;
}

/// A conversion that decodes data and may therefore fail.
///
/// Faces fall in this category: their bitmaps are decompressed and their
/// lig/kern programs walked.
pub trait TryFromObjRef<T: ?Sized>: Sized {
    fn try_from_obj_ref(from: &T) -> Result<Self, ReadError>;
}

/// A conversion from a parsed object to an owned one.
///
/// Like [`std::convert::Into`], this is provided as a blanket impl when you
/// implement [`FromObjRef<T>`].
pub trait ToOwnedObj<T> {
    fn to_owned_obj(&self) -> T;
}

/// The fallible counterpart of [`ToOwnedObj`].
pub trait TryToOwnedObj<T> {
    fn try_to_owned_obj(&self) -> Result<T, ReadError>;
}

impl<U, T> ToOwnedObj<U> for T
where
    U: FromObjRef<T>,
{
    fn to_owned_obj(&self) -> U {
        U::from_obj_ref(self)
    }
}

impl<U, T> TryToOwnedObj<U> for T
where
    U: TryFromObjRef<T>,
{
    fn try_to_owned_obj(&self) -> Result<U, ReadError> {
        U::try_from_obj_ref(self)
    }
}

impl FromObjRef<read_face::FaceHeader> for FaceHeader {
    fn from_obj_ref(from: &read_face::FaceHeader) -> Self {
        FaceHeader {
            point_size: from.point_size(),
            line_height: from.line_height(),
            dpi: from.dpi(),
            x_height: from.x_height(),
            em_size: from.em_size(),
            slant_correction: from.slant_correction(),
            descender_height: from.descender_height(),
            space_size: from.space_size(),
        }
    }
}

impl FromObjRef<read_face::GlyphInfo> for GlyphInfo {
    fn from_obj_ref(from: &read_face::GlyphInfo) -> Self {
        GlyphInfo {
            horizontal_offset: from.horizontal_offset(),
            vertical_offset: from.vertical_offset(),
            advance: from.advance(),
            main_code: from.main_code(),
        }
    }
}

impl FromObjRef<Planes<'_>> for PlaneTable {
    fn from_obj_ref(from: &Planes) -> Self {
        let mut table = PlaneTable {
            bundles: from.bundles().to_vec(),
            ..Default::default()
        };
        for (plane, read) in table.planes.iter_mut().zip(from.planes()) {
            *plane = *read;
        }
        table
    }
}

impl TryFromObjRef<read_face::Face<'_>> for Face {
    fn try_from_obj_ref(from: &read_face::Face) -> Result<Self, ReadError> {
        let glyphs = (0..from.glyph_count())
            .map(GlyphCode::new)
            .map(|code| {
                Ok(Glyph {
                    info: GlyphInfo::from_obj_ref(from.glyph_info(code)?),
                    bitmap: from.bitmap(code)?,
                    lig_kern: from.lig_kern(code)?,
                })
            })
            .collect::<Result<_, ReadError>>()?;
        Ok(Face {
            header: FaceHeader::from_obj_ref(from.header()),
            glyphs,
        })
    }
}

impl TryFromObjRef<read_backup::BackupEntry<'_>> for BackupGlyph {
    fn try_from_obj_ref(from: &read_backup::BackupEntry) -> Result<Self, ReadError> {
        let bitmap = rle::decode(&from.rle_bitmap()).map_err(|error| ReadError::MalformedBitmap {
            glyph: from.info.main_code(),
            error,
        })?;
        Ok(BackupGlyph {
            info: GlyphInfo::from_obj_ref(from.info),
            bitmap,
            ligatures: from
                .ligatures
                .iter()
                .map(|lig| (lig.next_code_point(), lig.replacement_code_point()))
                .collect(),
            kerns: from
                .kerns
                .iter()
                .map(|kern| (kern.next_code_point(), kern.kern()))
                .collect(),
        })
    }
}

impl TryFromObjRef<read_backup::BackupFace<'_>> for BackupFace {
    fn try_from_obj_ref(from: &read_backup::BackupFace) -> Result<Self, ReadError> {
        let mut face = BackupFace::new(FaceHeader::from_obj_ref(from.header()));
        for entry in from.entries() {
            face.insert(entry.code_point, BackupGlyph::try_from_obj_ref(entry)?);
        }
        Ok(face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump_table;
    use pretty_assertions::assert_eq;
    use read::{
        bitmap::Bitmap,
        tables::lig_kern::{GlyphKernStep, GlyphLigKern},
        FontData, FontRead,
    };
    use types::Fix16;

    #[test]
    fn face_round_trip() {
        let mut header = FaceHeader::new(14, 96);
        header.x_height = Fix16::from_f32(6.5);
        header.descender_height = 3;
        let glyphs = vec![
            Glyph {
                bitmap: Bitmap::from_ascii_rows(&["###", "#.#", "###"]),
                lig_kern: GlyphLigKern {
                    ligatures: vec![],
                    kerns: vec![GlyphKernStep {
                        next: GlyphCode::new(1),
                        kern: Fix16::from_f32(-0.25),
                    }],
                },
                ..Glyph::empty(GlyphCode::new(0))
            },
            Glyph::empty(GlyphCode::new(0)),
        ];
        let face = Face::new(header, glyphs);
        let bytes = dump_table(&face.compile().unwrap()).unwrap();
        let read = read_face::Face::read(FontData::new(&bytes)).unwrap();
        let owned: Face = read.try_to_owned_obj().unwrap();
        assert_eq!(owned, face);
    }

    #[test]
    fn fixture_faces_recompile_unchanged() {
        let font = read::FontRef::new(ibmf_test_data::UTF32_TWO_FACES).unwrap();
        for ix in 0..font.face_count() {
            let read_face = font.face(ix).unwrap();
            let face = Face::try_from_obj_ref(&read_face).unwrap();
            let bytes = dump_table(&face.compile().unwrap()).unwrap();
            let start = font.file_header().face_offset(ix).unwrap();
            let original = &ibmf_test_data::UTF32_TWO_FACES[start..start + read_face.byte_len()];
            assert_eq!(bytes, original);
        }
    }

    #[test]
    fn planes_round_trip() {
        let table = PlaneTable::from_code_points([0x41, 0x10400, 0x10401]).unwrap();
        let copy: PlaneTable = table.charmap().to_owned_obj();
        assert_eq!(copy, table);
    }
}
