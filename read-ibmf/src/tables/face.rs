//! A face: one point size of the typeface.
//!
//! Each face starts with a [`FaceHeader`], followed by a pool index per glyph,
//! a [`GlyphInfo`] per glyph, the pixel pool holding the compressed bitmaps
//! (zero padded to a four byte boundary) and finally the shared
//! ligature/kerning program.

use types::{Fix16, FixedSize, GlyphCode, LittleEndian, RleMetrics};

use crate::{
    bitmap::Bitmap,
    rle::{self, RleBitmap},
    tables::lig_kern::{GlyphLigKern, LigKernStep},
    Cursor, FontData, FontRead, ReadError,
};

/// Face level metrics.
#[derive(Copy, Clone, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct FaceHeader {
    pub point_size: u8,
    /// Distance between two baselines, in pixels.
    pub line_height: u8,
    pub dpi: LittleEndian<u16>,
    pub x_height: LittleEndian<Fix16>,
    pub em_size: LittleEndian<Fix16>,
    pub slant_correction: LittleEndian<Fix16>,
    pub descender_height: u8,
    pub space_size: u8,
    pub glyph_count: LittleEndian<u16>,
    pub lig_kern_step_count: LittleEndian<u16>,
    pub pixels_pool_size: LittleEndian<u32>,
}

impl FixedSize for FaceHeader {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self>();
}

impl FaceHeader {
    pub fn point_size(&self) -> u8 {
        self.point_size
    }

    pub fn line_height(&self) -> u8 {
        self.line_height
    }

    pub fn dpi(&self) -> u16 {
        self.dpi.get()
    }

    pub fn x_height(&self) -> Fix16 {
        self.x_height.get()
    }

    pub fn em_size(&self) -> Fix16 {
        self.em_size.get()
    }

    pub fn slant_correction(&self) -> Fix16 {
        self.slant_correction.get()
    }

    pub fn descender_height(&self) -> u8 {
        self.descender_height
    }

    /// Advance of the space character, in pixels.
    pub fn space_size(&self) -> u8 {
        self.space_size
    }

    pub fn glyph_count(&self) -> u16 {
        self.glyph_count.get()
    }

    pub fn lig_kern_step_count(&self) -> u16 {
        self.lig_kern_step_count.get()
    }

    pub fn pixels_pool_size(&self) -> u32 {
        self.pixels_pool_size.get()
    }
}

impl std::fmt::Debug for FaceHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceHeader")
            .field("point_size", &self.point_size())
            .field("line_height", &self.line_height())
            .field("dpi", &self.dpi())
            .field("x_height", &self.x_height())
            .field("em_size", &self.em_size())
            .field("slant_correction", &self.slant_correction())
            .field("descender_height", &self.descender_height())
            .field("space_size", &self.space_size())
            .field("glyph_count", &self.glyph_count())
            .field("lig_kern_step_count", &self.lig_kern_step_count())
            .field("pixels_pool_size", &self.pixels_pool_size())
            .finish()
    }
}

/// Per glyph metrics and packing information.
#[derive(Copy, Clone, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct GlyphInfo {
    pub bitmap_width: u8,
    pub bitmap_height: u8,
    pub horizontal_offset: i8,
    pub vertical_offset: i8,
    pub packet_length: LittleEndian<u16>,
    pub advance: LittleEndian<Fix16>,
    pub rle_metrics: LittleEndian<RleMetrics>,
    /// Entry point into the face's lig/kern program, 255 if none.
    pub lig_kern_pgm_index: u8,
    /// The glyph this one is derived from, or its own code.
    pub main_code: LittleEndian<GlyphCode>,
}

impl FixedSize for GlyphInfo {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self>();
}

impl GlyphInfo {
    pub fn bitmap_width(&self) -> u8 {
        self.bitmap_width
    }

    pub fn bitmap_height(&self) -> u8 {
        self.bitmap_height
    }

    /// Horizontal distance from the origin to the left edge of the bitmap.
    pub fn horizontal_offset(&self) -> i8 {
        self.horizontal_offset
    }

    /// Vertical distance from the baseline to the top edge of the bitmap.
    pub fn vertical_offset(&self) -> i8 {
        self.vertical_offset
    }

    pub fn packet_length(&self) -> u16 {
        self.packet_length.get()
    }

    pub fn advance(&self) -> Fix16 {
        self.advance.get()
    }

    pub fn rle_metrics(&self) -> RleMetrics {
        self.rle_metrics.get()
    }

    pub fn lig_kern_pgm_index(&self) -> u8 {
        self.lig_kern_pgm_index
    }

    pub fn main_code(&self) -> GlyphCode {
        self.main_code.get()
    }
}

impl std::fmt::Debug for GlyphInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphInfo")
            .field("bitmap_width", &self.bitmap_width())
            .field("bitmap_height", &self.bitmap_height())
            .field("horizontal_offset", &self.horizontal_offset())
            .field("vertical_offset", &self.vertical_offset())
            .field("packet_length", &self.packet_length())
            .field("advance", &self.advance())
            .field("rle_metrics", &self.rle_metrics())
            .field("lig_kern_pgm_index", &self.lig_kern_pgm_index())
            .field("main_code", &self.main_code())
            .finish()
    }
}

/// The tables of a single face.
#[derive(Clone)]
pub struct Face<'a> {
    header: &'a FaceHeader,
    pool_indexes: &'a [LittleEndian<u32>],
    glyph_infos: &'a [GlyphInfo],
    pixel_pool: &'a [u8],
    lig_kern_steps: &'a [LigKernStep],
    byte_len: usize,
}

impl<'a> Face<'a> {
    pub fn header(&self) -> &'a FaceHeader {
        self.header
    }

    pub fn glyph_count(&self) -> u16 {
        self.header.glyph_count()
    }

    /// Position in the pixel pool of each glyph's packet.
    pub fn pool_indexes(&self) -> &'a [LittleEndian<u32>] {
        self.pool_indexes
    }

    pub fn glyph_infos(&self) -> &'a [GlyphInfo] {
        self.glyph_infos
    }

    pub fn glyph_info(&self, glyph: GlyphCode) -> Result<&'a GlyphInfo, ReadError> {
        self.glyph_infos
            .get(glyph.to_usize())
            .ok_or(ReadError::OutOfBounds)
    }

    pub fn pixel_pool(&self) -> &'a [u8] {
        self.pixel_pool
    }

    pub fn lig_kern_steps(&self) -> &'a [LigKernStep] {
        self.lig_kern_steps
    }

    /// The number of bytes the face occupies, padding included.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// The compressed bitmap of a glyph.
    pub fn rle_bitmap(&self, glyph: GlyphCode) -> Result<RleBitmap<'a>, ReadError> {
        let info = self.glyph_info(glyph)?;
        let start = self
            .pool_indexes
            .get(glyph.to_usize())
            .ok_or(ReadError::OutOfBounds)?
            .get() as usize;
        let end = start + info.packet_length() as usize;
        let data = self
            .pixel_pool
            .get(start..end)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(RleBitmap {
            data,
            width: info.bitmap_width() as u32,
            height: info.bitmap_height() as u32,
            metrics: info.rle_metrics(),
        })
    }

    /// Decodes the bitmap of a glyph.
    pub fn bitmap(&self, glyph: GlyphCode) -> Result<Bitmap, ReadError> {
        let packed = self.rle_bitmap(glyph)?;
        rle::decode(&packed).map_err(|error| ReadError::MalformedBitmap { glyph, error })
    }

    /// Walks the lig/kern program of a glyph.
    pub fn lig_kern(&self, glyph: GlyphCode) -> Result<GlyphLigKern, ReadError> {
        let info = self.glyph_info(glyph)?;
        GlyphLigKern::read(self.lig_kern_steps, info.lig_kern_pgm_index())
    }

    pub(crate) fn read_with_cursor(cursor: &mut Cursor<'a>) -> Result<Self, ReadError> {
        let start = cursor.position();
        let header: &FaceHeader = cursor.read_ref()?;
        let glyph_count = header.glyph_count() as usize;
        let pool_indexes = cursor.read_array(glyph_count)?;
        let glyph_infos = cursor.read_array(glyph_count)?;
        let pixel_pool = cursor.read_bytes(header.pixels_pool_size() as usize)?;
        cursor.align_to(4);
        let lig_kern_steps = cursor.read_array(header.lig_kern_step_count() as usize)?;
        Ok(Face {
            header,
            pool_indexes,
            glyph_infos,
            pixel_pool,
            lig_kern_steps,
            byte_len: cursor.position() - start,
        })
    }
}

impl<'a> FontRead<'a> for Face<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Self::read_with_cursor(&mut data.cursor())
    }
}

impl std::fmt::Debug for Face<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Face")
            .field("header", self.header)
            .field("byte_len", &self.byte_len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::LeBuffer;

    #[test]
    fn record_sizes() {
        assert_eq!(FaceHeader::RAW_BYTE_LEN, 20);
        assert_eq!(GlyphInfo::RAW_BYTE_LEN, 12);
    }

    fn one_glyph_face() -> LeBuffer {
        LeBuffer::new()
            // header
            .push(10u8)
            .push(12u8)
            .push(75u16)
            .push(Fix16::from_i32(5))
            .push(Fix16::from_i32(10))
            .push(Fix16::ZERO)
            .push(3u8)
            .push(4u8)
            .push(1u16) // glyph count
            .push(1u16) // lig kern steps
            .push(1u32) // pool size
            // pool indexes
            .push(0u32)
            // glyph info: 1x1, kerning program at 0
            .extend([1u8, 1])
            .extend([0i8, 1])
            .push(1u16)
            .push(Fix16::from_i32(2))
            .push(RleMetrics::new(1, true))
            .push(0u8)
            .push(GlyphCode::new(0))
            // pixel pool, padded
            .extend([0x10u8, 0, 0, 0])
            // kern against glyph 0 by one pixel, stop
            .push(0x8000u16)
            .push(0x8000u16 | 64)
    }

    #[test]
    fn read_face() {
        let buf = one_glyph_face();
        let face = Face::read(buf.font_data()).unwrap();
        assert_eq!(face.header().dpi(), 75);
        assert_eq!(face.header().x_height(), Fix16::from_i32(5));
        assert_eq!(face.byte_len(), buf.len());
        let glyph = GlyphCode::new(0);
        let info = face.glyph_info(glyph).unwrap();
        assert_eq!(info.advance(), Fix16::from_i32(2));
        assert!(info.rle_metrics().first_is_black());
        let bitmap = face.bitmap(glyph).unwrap();
        assert_eq!(bitmap, Bitmap::from_ascii_rows(&["#"]));
        let lig_kern = face.lig_kern(glyph).unwrap();
        assert!(lig_kern.ligatures.is_empty());
        assert_eq!(lig_kern.kerns.len(), 1);
        assert_eq!(lig_kern.kerns[0].kern, Fix16::ONE);
    }

    #[test]
    fn truncated_face() {
        let buf = one_glyph_face();
        let data = FontData::new(&buf[..buf.len() - 1]);
        assert_eq!(Face::read(data).unwrap_err(), ReadError::OutOfBounds);
    }

    #[test]
    fn packet_outside_pool() {
        let mut buf = one_glyph_face();
        buf.write_at(20, 4u32);
        let face = Face::read(buf.font_data()).unwrap();
        assert_eq!(
            face.bitmap(GlyphCode::new(0)).unwrap_err(),
            ReadError::OutOfBounds
        );
    }
}
