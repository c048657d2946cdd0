//! Glyph backups.
//!
//! Entries are keyed by code point; recording a code point again replaces
//! its entry in place.

use indexmap::IndexMap;
use read::{
    bitmap::Bitmap,
    tables::{
        backup::{BackupKernStep, BackupLigStep},
        face as read_face,
    },
};
use types::{Fix16, GlyphCode, NO_LIG_KERN_PGM};

use crate::{
    error::Error,
    tables::face::{encode_packet, validate_bitmap, FaceHeader, GlyphInfo},
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// A backed up glyph, with its lig/kern partners given as code points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackupGlyph {
    pub info: GlyphInfo,
    pub bitmap: Bitmap,
    /// `(next, replacement)` code points.
    pub ligatures: Vec<(u32, u32)>,
    /// `(next, kern)` pairs.
    pub kerns: Vec<(u32, Fix16)>,
}

/// The backed up glyphs of one face.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackupFace {
    pub header: FaceHeader,
    pub entries: IndexMap<u32, BackupGlyph>,
}

#[derive(Clone, Debug)]
struct CompiledEntry {
    code_point: u32,
    info: read_face::GlyphInfo,
    packet: Vec<u8>,
    ligatures: Vec<BackupLigStep>,
    kerns: Vec<BackupKernStep>,
}

/// A backup face with its bitmaps compressed.
#[derive(Clone, Debug)]
pub struct CompiledBackupFace {
    header: read_face::FaceHeader,
    entries: Vec<CompiledEntry>,
}

impl BackupFace {
    pub fn new(header: FaceHeader) -> Self {
        BackupFace {
            header,
            entries: IndexMap::new(),
        }
    }

    /// Records a glyph, returning the entry it replaces.
    pub fn insert(&mut self, code_point: u32, glyph: BackupGlyph) -> Option<BackupGlyph> {
        self.entries.insert(code_point, glyph)
    }

    pub fn get(&self, code_point: u32) -> Option<&BackupGlyph> {
        self.entries.get(&code_point)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn compile(&self) -> Result<CompiledBackupFace, Error> {
        self.validate()?;
        let mut pool_size = 0;
        let entries = self
            .entries
            .iter()
            .map(|(code_point, glyph)| {
                // glyph codes of another font mean nothing here
                let packet = encode_packet(&glyph.bitmap, GlyphCode::NO_GLYPH)?;
                pool_size += packet.data.len() as u32;
                Ok(CompiledEntry {
                    code_point: *code_point,
                    info: glyph.info.to_record(&glyph.bitmap, &packet, NO_LIG_KERN_PGM),
                    packet: packet.data,
                    ligatures: glyph
                        .ligatures
                        .iter()
                        .map(|(next, replacement)| BackupLigStep {
                            next_code_point: (*next).into(),
                            replacement_code_point: (*replacement).into(),
                        })
                        .collect(),
                    kerns: glyph
                        .kerns
                        .iter()
                        .map(|(next, kern)| BackupKernStep {
                            next_code_point: (*next).into(),
                            kern: (*kern).into(),
                            padding: 0u16.into(),
                        })
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(CompiledBackupFace {
            header: self.header.to_record(entries.len() as u16, 0, pool_size),
            entries,
        })
    }
}

impl Validate for BackupFace {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("BackupFace", |ctx| {
            ctx.in_field("entries", |ctx| {
                if self.entries.len() > u16::MAX as usize {
                    ctx.report(format!("too many entries: {}", self.entries.len()));
                }
                for (i, glyph) in self.entries.values().enumerate() {
                    ctx.in_item(i, |ctx| {
                        ctx.in_field("bitmap", |ctx| validate_bitmap(&glyph.bitmap, ctx));
                        if glyph.ligatures.len() > u16::MAX as usize
                            || glyph.kerns.len() > u16::MAX as usize
                        {
                            ctx.report("too many lig/kern steps");
                        }
                    });
                }
            })
        })
    }
}

impl FontWrite for BackupLigStep {
    fn write_into(&self, writer: &mut TableWriter) {
        self.next_code_point.write_into(writer);
        self.replacement_code_point.write_into(writer);
    }
}

impl FontWrite for BackupKernStep {
    fn write_into(&self, writer: &mut TableWriter) {
        self.next_code_point.write_into(writer);
        self.kern.write_into(writer);
        self.padding.write_into(writer);
    }
}

impl FontWrite for CompiledEntry {
    fn write_into(&self, writer: &mut TableWriter) {
        self.code_point.write_into(writer);
        self.info.write_into(writer);
        (self.ligatures.len() as u16).write_into(writer);
        (self.kerns.len() as u16).write_into(writer);
        writer.write_slice(&self.packet);
        writer.pad_to_4();
        self.ligatures.write_into(writer);
        self.kerns.write_into(writer);
    }
}

impl FontWrite for CompiledBackupFace {
    fn write_into(&self, writer: &mut TableWriter) {
        self.header.write_into(writer);
        self.entries.write_into(writer);
    }
}

impl Validate for CompiledBackupFace {
    fn validate_impl(&self, _ctx: &mut ValidationCtx) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump_table;
    use pretty_assertions::assert_eq;
    use read::{tables::backup::BackupFace as BackupFaceRef, FontData, FontRead};

    fn glyph(rows: &[&str]) -> BackupGlyph {
        BackupGlyph {
            info: GlyphInfo {
                advance: Fix16::from_i32(5),
                ..GlyphInfo::new(GlyphCode::new(3))
            },
            bitmap: Bitmap::from_ascii_rows(rows),
            ligatures: vec![(0x69, 0xFB01)],
            kerns: vec![(0x41, Fix16::from_f32(-0.5))],
        }
    }

    #[test]
    fn replace_keeps_order() {
        let mut face = BackupFace::new(FaceHeader::new(12, 75));
        assert!(face.insert(0x66, glyph(&["#"])).is_none());
        face.insert(0x67, glyph(&["##"]));
        let previous = face.insert(0x66, glyph(&["###"])).unwrap();
        assert_eq!(previous.bitmap.width(), 1);
        assert_eq!(face.entries.keys().copied().collect::<Vec<_>>(), vec![0x66, 0x67]);
        assert_eq!(face.get(0x66).unwrap().bitmap.width(), 3);
    }

    #[test]
    fn write_and_read_back() {
        let mut face = BackupFace::new(FaceHeader::new(12, 75));
        face.insert(0x66, glyph(&["#.", ".#", "##"]));
        face.insert(0x1F600, glyph(&[]));
        let bytes = dump_table(&face.compile().unwrap()).unwrap();
        let read = BackupFaceRef::read(FontData::new(&bytes)).unwrap();
        assert_eq!(read.byte_len(), bytes.len());
        assert_eq!(read.header().glyph_count(), 2);
        assert_eq!(read.header().lig_kern_step_count(), 0);
        let entry = read.entry(0x66).unwrap();
        assert_eq!(entry.info.advance(), Fix16::from_i32(5));
        assert_eq!(entry.info.lig_kern_pgm_index(), NO_LIG_KERN_PGM);
        assert_eq!(
            read::rle::decode(&entry.rle_bitmap()).unwrap(),
            face.get(0x66).unwrap().bitmap
        );
        assert_eq!(entry.ligatures[0].replacement_code_point(), 0xFB01);
        assert_eq!(entry.kerns[0].kern(), Fix16::from_f32(-0.5));
        assert!(read.entry(0x1F600).unwrap().packet.is_empty());
        assert_eq!(
            read.header().pixels_pool_size() as usize,
            entry.packet.len()
        );
    }
}
