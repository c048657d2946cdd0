//! Faces: metrics, glyph bitmaps and lig/kern views.
//!
//! An owned [`Face`] holds the data an editor manipulates. Everything the file
//! stores in addition (packet lengths, pool positions, RLE metrics, the shared
//! lig/kern program) is derived by [`Face::compile`].

use read::{
    bitmap::Bitmap,
    tables::{
        face as read_face,
        lig_kern::{GlyphLigKern, LigKernStep},
    },
};
use types::{Fix16, GlyphCode, RleMetrics};

use crate::{
    error::Error,
    lig_kern,
    rle::{self, EncodedBitmap},
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// Face level metrics.
///
/// Glyph count, program length and pool size are not stored here; they are
/// computed when the face is compiled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceHeader {
    pub point_size: u8,
    pub line_height: u8,
    pub dpi: u16,
    pub x_height: Fix16,
    pub em_size: Fix16,
    pub slant_correction: Fix16,
    pub descender_height: u8,
    pub space_size: u8,
}

impl FaceHeader {
    pub fn new(point_size: u8, dpi: u16) -> Self {
        FaceHeader {
            point_size,
            dpi,
            ..Default::default()
        }
    }

    pub(crate) fn to_record(
        &self,
        glyph_count: u16,
        lig_kern_step_count: u16,
        pixels_pool_size: u32,
    ) -> read_face::FaceHeader {
        read_face::FaceHeader {
            point_size: self.point_size,
            line_height: self.line_height,
            dpi: self.dpi.into(),
            x_height: self.x_height.into(),
            em_size: self.em_size.into(),
            slant_correction: self.slant_correction.into(),
            descender_height: self.descender_height,
            space_size: self.space_size,
            glyph_count: glyph_count.into(),
            lig_kern_step_count: lig_kern_step_count.into(),
            pixels_pool_size: pixels_pool_size.into(),
        }
    }
}

/// The editable metrics of a glyph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphInfo {
    pub horizontal_offset: i8,
    pub vertical_offset: i8,
    pub advance: Fix16,
    /// The glyph whose kerning this one shares.
    pub main_code: GlyphCode,
}

impl GlyphInfo {
    pub fn new(main_code: GlyphCode) -> Self {
        GlyphInfo {
            main_code,
            ..Default::default()
        }
    }

    pub(crate) fn to_record(
        &self,
        bitmap: &Bitmap,
        packet: &EncodedBitmap,
        lig_kern_pgm_index: u8,
    ) -> read_face::GlyphInfo {
        read_face::GlyphInfo {
            bitmap_width: bitmap.width() as u8,
            bitmap_height: bitmap.height() as u8,
            horizontal_offset: self.horizontal_offset,
            vertical_offset: self.vertical_offset,
            packet_length: (packet.data.len() as u16).into(),
            advance: self.advance.into(),
            rle_metrics: packet.metrics.into(),
            lig_kern_pgm_index,
            main_code: self.main_code.into(),
        }
    }
}

/// A glyph: metrics, bitmap and lig/kern view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph {
    pub info: GlyphInfo,
    pub bitmap: Bitmap,
    pub lig_kern: GlyphLigKern,
}

impl Glyph {
    /// A glyph without pixels or lig/kern steps.
    pub fn empty(main_code: GlyphCode) -> Self {
        Glyph {
            info: GlyphInfo::new(main_code),
            ..Default::default()
        }
    }
}

/// One point size of a typeface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Face {
    pub header: FaceHeader,
    /// Indexed by glyph code.
    pub glyphs: Vec<Glyph>,
}

/// A face with all derived data rebuilt, ready to be written.
#[derive(Clone, Debug)]
pub struct CompiledFace {
    pub header: read_face::FaceHeader,
    pub pool_indexes: Vec<u32>,
    pub glyph_infos: Vec<read_face::GlyphInfo>,
    pub pixel_pool: Vec<u8>,
    pub lig_kern_steps: Vec<LigKernStep>,
}

/// Compresses a glyph bitmap; zero sized bitmaps become empty packets.
pub(crate) fn encode_packet(bitmap: &Bitmap, glyph: GlyphCode) -> Result<EncodedBitmap, Error> {
    if bitmap.is_empty() {
        return Ok(EncodedBitmap {
            data: Vec::new(),
            metrics: RleMetrics::default(),
        });
    }
    rle::encode(bitmap).map_err(|_| Error::EmptyBitmap(Some(glyph)))
}

impl Face {
    pub fn new(header: FaceHeader, glyphs: Vec<Glyph>) -> Self {
        Face { header, glyphs }
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyph(&self, glyph: GlyphCode) -> Option<&Glyph> {
        self.glyphs.get(glyph.to_usize())
    }

    /// Rebuilds the pixel pool and the lig/kern program.
    pub fn compile(&self) -> Result<CompiledFace, Error> {
        self.validate()?;
        let program = lig_kern::compile(self.glyphs.iter().map(|glyph| &glyph.lig_kern))?;
        let mut pixel_pool = Vec::new();
        let mut pool_indexes = Vec::with_capacity(self.glyphs.len());
        let mut glyph_infos = Vec::with_capacity(self.glyphs.len());
        for ((code, glyph), pgm_index) in self.glyphs.iter().enumerate().zip(program.pgm_indices()) {
            let packet = encode_packet(&glyph.bitmap, GlyphCode::new(code as u16))?;
            pool_indexes.push(pixel_pool.len() as u32);
            glyph_infos.push(glyph.info.to_record(&glyph.bitmap, &packet, pgm_index));
            pixel_pool.extend_from_slice(&packet.data);
        }
        log::debug!(
            "compiled {}pt face: {} glyphs, {} lig/kern steps, {} pool bytes",
            self.header.point_size,
            self.glyphs.len(),
            program.steps.len(),
            pixel_pool.len()
        );
        Ok(CompiledFace {
            header: self.header.to_record(
                self.glyphs.len() as u16,
                program.steps.len() as u16,
                pixel_pool.len() as u32,
            ),
            pool_indexes,
            glyph_infos,
            pixel_pool,
            lig_kern_steps: program.steps,
        })
    }
}

impl Validate for Face {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("Face", |ctx| {
            ctx.in_field("glyphs", |ctx| {
                if self.glyphs.len() > GlyphCode::MAX.to_usize() + 1 {
                    ctx.report(format!("too many glyphs: {}", self.glyphs.len()));
                }
                self.glyphs.validate_impl(ctx);
            })
        })
    }
}

impl Validate for Glyph {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_field("bitmap", |ctx| validate_bitmap(&self.bitmap, ctx));
        ctx.in_field("main_code", |ctx| {
            if !self.info.main_code.is_glyph() {
                ctx.report(format!("reserved glyph code {}", self.info.main_code));
            }
        });
        ctx.in_field("lig_kern", |ctx| {
            let codes = self
                .lig_kern
                .ligatures
                .iter()
                .flat_map(|lig| [lig.next, lig.replacement])
                .chain(self.lig_kern.kerns.iter().map(|kern| kern.next));
            for code in codes.filter(|code| !code.is_glyph()) {
                ctx.report(format!("reserved glyph code {code}"));
            }
        });
    }
}

pub(crate) fn validate_bitmap(bitmap: &Bitmap, ctx: &mut ValidationCtx) {
    let (width, height) = (bitmap.width(), bitmap.height());
    if width > u8::MAX as u32 || height > u8::MAX as u32 {
        ctx.report(format!("bitmap of {width}x{height} exceeds 255x255"));
    }
}

impl FontWrite for read_face::FaceHeader {
    fn write_into(&self, writer: &mut TableWriter) {
        self.point_size.write_into(writer);
        self.line_height.write_into(writer);
        self.dpi.write_into(writer);
        self.x_height.write_into(writer);
        self.em_size.write_into(writer);
        self.slant_correction.write_into(writer);
        self.descender_height.write_into(writer);
        self.space_size.write_into(writer);
        self.glyph_count.write_into(writer);
        self.lig_kern_step_count.write_into(writer);
        self.pixels_pool_size.write_into(writer);
    }
}

impl FontWrite for read_face::GlyphInfo {
    fn write_into(&self, writer: &mut TableWriter) {
        self.bitmap_width.write_into(writer);
        self.bitmap_height.write_into(writer);
        self.horizontal_offset.write_into(writer);
        self.vertical_offset.write_into(writer);
        self.packet_length.write_into(writer);
        self.advance.write_into(writer);
        self.rle_metrics.write_into(writer);
        self.lig_kern_pgm_index.write_into(writer);
        self.main_code.write_into(writer);
    }
}

impl FontWrite for LigKernStep {
    fn write_into(&self, writer: &mut TableWriter) {
        self.a().write_into(writer);
        self.b().write_into(writer);
    }
}

impl FontWrite for CompiledFace {
    fn write_into(&self, writer: &mut TableWriter) {
        self.header.write_into(writer);
        self.pool_indexes.write_into(writer);
        self.glyph_infos.write_into(writer);
        writer.write_slice(&self.pixel_pool);
        writer.pad_to_4();
        self.lig_kern_steps.write_into(writer);
    }
}

impl Validate for CompiledFace {
    fn validate_impl(&self, _ctx: &mut ValidationCtx) {}
}
