//! Glyph backups.
//!
//! A backup file shares the preamble and offset table of a regular font but
//! uses the [`Backup`](types::FontFormat::Backup) format. Each face holds a
//! list of hand edited glyphs, keyed by code point, so that the edits can be
//! re-applied to a font whose glyph numbering has changed. For the same
//! reason ligature and kerning partners are stored as code points.

use types::{Fix16, FixedSize, LittleEndian};

use crate::{
    rle::RleBitmap,
    tables::face::{FaceHeader, GlyphInfo},
    Cursor, FontData, FontRead, ReadError,
};

/// A ligature of a backed up glyph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct BackupLigStep {
    pub next_code_point: LittleEndian<u32>,
    pub replacement_code_point: LittleEndian<u32>,
}

impl FixedSize for BackupLigStep {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self>();
}

impl BackupLigStep {
    pub fn next_code_point(&self) -> u32 {
        self.next_code_point.get()
    }

    pub fn replacement_code_point(&self) -> u32 {
        self.replacement_code_point.get()
    }
}

/// A kerning pair of a backed up glyph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct BackupKernStep {
    pub next_code_point: LittleEndian<u32>,
    pub kern: LittleEndian<Fix16>,
    pub padding: LittleEndian<u16>,
}

impl FixedSize for BackupKernStep {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self>();
}

impl BackupKernStep {
    pub fn next_code_point(&self) -> u32 {
        self.next_code_point.get()
    }

    pub fn kern(&self) -> Fix16 {
        self.kern.get()
    }
}

/// One backed up glyph.
#[derive(Clone, Debug)]
pub struct BackupEntry<'a> {
    pub code_point: u32,
    pub info: &'a GlyphInfo,
    pub packet: &'a [u8],
    pub ligatures: &'a [BackupLigStep],
    pub kerns: &'a [BackupKernStep],
}

impl<'a> BackupEntry<'a> {
    pub fn rle_bitmap(&self) -> RleBitmap<'a> {
        RleBitmap {
            data: self.packet,
            width: self.info.bitmap_width() as u32,
            height: self.info.bitmap_height() as u32,
            metrics: self.info.rle_metrics(),
        }
    }

    pub(crate) fn read_with_cursor(cursor: &mut Cursor<'a>) -> Result<Self, ReadError> {
        let code_point = cursor.read()?;
        let info: &GlyphInfo = cursor.read_ref()?;
        let lig_count: u16 = cursor.read()?;
        let kern_count: u16 = cursor.read()?;
        let packet = cursor.read_bytes(info.packet_length() as usize)?;
        cursor.align_to(4);
        Ok(BackupEntry {
            code_point,
            info,
            packet,
            ligatures: cursor.read_array(lig_count as usize)?,
            kerns: cursor.read_array(kern_count as usize)?,
        })
    }
}

/// The backed up glyphs of one face.
#[derive(Clone, Debug)]
pub struct BackupFace<'a> {
    header: &'a FaceHeader,
    entries: Vec<BackupEntry<'a>>,
    byte_len: usize,
}

impl<'a> BackupFace<'a> {
    pub fn header(&self) -> &'a FaceHeader {
        self.header
    }

    pub fn entries(&self) -> &[BackupEntry<'a>] {
        &self.entries
    }

    pub fn entry(&self, code_point: u32) -> Option<&BackupEntry<'a>> {
        self.entries.iter().find(|e| e.code_point == code_point)
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub(crate) fn read_with_cursor(cursor: &mut Cursor<'a>) -> Result<Self, ReadError> {
        let start = cursor.position();
        let header: &FaceHeader = cursor.read_ref()?;
        let entries = (0..header.glyph_count())
            .map(|_| BackupEntry::read_with_cursor(cursor))
            .collect::<Result<Vec<_>, _>>()?;
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.code_point == entry.code_point) {
                return Err(ReadError::MalformedData("duplicate backup entry"));
            }
        }
        Ok(BackupFace {
            header,
            entries,
            byte_len: cursor.position() - start,
        })
    }
}

impl<'a> FontRead<'a> for BackupFace<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Self::read_with_cursor(&mut data.cursor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::LeBuffer;
    use types::{GlyphCode, RleMetrics};

    fn face_header(entries: u16, pool: u32) -> LeBuffer {
        LeBuffer::new()
            .extend([12u8, 14])
            .push(75u16)
            .extend([Fix16::ZERO; 3])
            .extend([2u8, 3])
            .push(entries)
            .push(0u16)
            .push(pool)
    }

    fn entry(buf: LeBuffer, code_point: u32) -> LeBuffer {
        buf.push(code_point)
            .extend([1u8, 1])
            .extend([0i8, 1])
            .push(1u16)
            .push(Fix16::from_i32(2))
            .push(RleMetrics::new(1, true))
            .push(255u8)
            .push(GlyphCode::new(0))
            .push(1u16) // ligatures
            .push(1u16) // kerns
            .extend([0x10u8, 0, 0, 0])
            .extend([0x69u32, 0xFB01])
            .push(0x41u32)
            .push(Fix16::from_i32(-1))
            .push(0u16)
    }

    #[test]
    fn read_backup_face() {
        let buf = entry(entry(face_header(2, 2), 0x66), 0x67);
        let face = BackupFace::read(buf.font_data()).unwrap();
        assert_eq!(face.byte_len(), buf.len());
        assert_eq!(face.entries().len(), 2);
        let f = face.entry(0x66).unwrap();
        assert_eq!(f.packet, &[0x10]);
        assert_eq!(f.ligatures[0].replacement_code_point(), 0xFB01);
        assert_eq!(f.kerns[0].next_code_point(), 0x41);
        assert_eq!(f.kerns[0].kern(), Fix16::from_i32(-1));
        assert_eq!(f.rle_bitmap().width, 1);
        assert!(face.entry(0x68).is_none());
    }

    #[test]
    fn duplicate_entries() {
        let buf = entry(entry(face_header(2, 2), 0x66), 0x66);
        assert!(matches!(
            BackupFace::read(buf.font_data()),
            Err(ReadError::MalformedData(_))
        ));
    }
}
