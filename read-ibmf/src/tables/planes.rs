//! Plane and bundle tables of UTF32 fonts.
//!
//! Code points are grouped into four planes of 65536 code points (only the
//! first four Unicode planes are supported). Each plane owns a run of
//! [`CodePointBundle`]s, each one a contiguous range of code points with
//! consecutive glyph codes. Glyph codes are numbered across bundles in order,
//! starting at the plane's `first_glyph_code`.

use types::{FixedSize, GlyphCode, LittleEndian};

use crate::{Cursor, ReadError};

/// The number of planes in a UTF32 font.
pub const PLANE_COUNT: usize = 4;

const SPACE: u32 = 0x20;

/// The bundle run of one Unicode plane.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct Plane {
    pub code_point_bundles_idx: LittleEndian<u16>,
    pub entries_count: LittleEndian<u16>,
    pub first_glyph_code: LittleEndian<u16>,
}

impl FixedSize for Plane {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self>();
}

impl Plane {
    pub fn new(code_point_bundles_idx: u16, entries_count: u16, first_glyph_code: u16) -> Self {
        Plane {
            code_point_bundles_idx: code_point_bundles_idx.into(),
            entries_count: entries_count.into(),
            first_glyph_code: first_glyph_code.into(),
        }
    }

    pub fn code_point_bundles_idx(&self) -> u16 {
        self.code_point_bundles_idx.get()
    }

    pub fn entries_count(&self) -> u16 {
        self.entries_count.get()
    }

    pub fn first_glyph_code(&self) -> u16 {
        self.first_glyph_code.get()
    }

    fn bundle_range(&self) -> std::ops::Range<usize> {
        let start = self.code_point_bundles_idx() as usize;
        start..start + self.entries_count() as usize
    }
}

/// An inclusive range of code points, relative to their plane.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct CodePointBundle {
    pub first_code_point: LittleEndian<u16>,
    pub last_code_point: LittleEndian<u16>,
}

impl FixedSize for CodePointBundle {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self>();
}

impl CodePointBundle {
    pub fn new(first_code_point: u16, last_code_point: u16) -> Self {
        CodePointBundle {
            first_code_point: first_code_point.into(),
            last_code_point: last_code_point.into(),
        }
    }

    pub fn first_code_point(&self) -> u16 {
        self.first_code_point.get()
    }

    pub fn last_code_point(&self) -> u16 {
        self.last_code_point.get()
    }

    /// Number of code points in the bundle.
    pub fn len(&self) -> u32 {
        (self.last_code_point() as u32 + 1).saturating_sub(self.first_code_point() as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A view of the plane and bundle tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Planes<'a> {
    planes: &'a [Plane],
    bundles: &'a [CodePointBundle],
}

impl<'a> Planes<'a> {
    pub fn new(planes: &'a [Plane], bundles: &'a [CodePointBundle]) -> Self {
        Planes { planes, bundles }
    }

    pub fn planes(&self) -> &'a [Plane] {
        self.planes
    }

    pub fn bundles(&self) -> &'a [CodePointBundle] {
        self.bundles
    }

    fn plane_bundles(&self, plane: &Plane) -> &'a [CodePointBundle] {
        self.bundles.get(plane.bundle_range()).unwrap_or_default()
    }

    /// Maps a code point to its glyph code.
    pub fn glyph_code(&self, code_point: u32) -> GlyphCode {
        let Some(plane) = self.planes.get((code_point >> 16) as usize) else {
            return GlyphCode::NO_GLYPH;
        };
        let low = code_point & 0xFFFF;
        let mut code = plane.first_glyph_code() as u32;
        for bundle in self.plane_bundles(plane) {
            let first = bundle.first_code_point() as u32;
            if (first..=bundle.last_code_point() as u32).contains(&low) {
                return u16::try_from(code.saturating_add(low - first))
                    .map(GlyphCode::new)
                    .unwrap_or(GlyphCode::NO_GLYPH);
            }
            code = code.saturating_add(bundle.len());
        }
        if code_point == SPACE {
            GlyphCode::SPACE
        } else {
            GlyphCode::NO_GLYPH
        }
    }

    /// Maps a glyph code back to its code point.
    pub fn code_point(&self, glyph: GlyphCode) -> Option<u32> {
        let target = glyph.to_u16() as u32;
        for (plane_ix, plane) in self.planes.iter().enumerate() {
            let mut code = plane.first_glyph_code() as u32;
            for bundle in self.plane_bundles(plane) {
                if (code..code.saturating_add(bundle.len())).contains(&target) {
                    let low = bundle.first_code_point() as u32 + (target - code);
                    return Some(((plane_ix as u32) << 16) | low);
                }
                code = code.saturating_add(bundle.len());
            }
        }
        None
    }

    /// Checks that every glyph code below `glyph_count` survives a trip
    /// through [`code_point`](Self::code_point) and
    /// [`glyph_code`](Self::glyph_code).
    pub fn check_round_trip(&self, glyph_count: u16) -> Result<(), ReadError> {
        for raw in 0..glyph_count {
            let glyph = GlyphCode::new(raw);
            let round_trip = self.code_point(glyph).map(|cp| self.glyph_code(cp));
            if round_trip != Some(glyph) {
                return Err(ReadError::InconsistentPlanes(glyph));
            }
        }
        Ok(())
    }

    pub(crate) fn read_with_cursor(cursor: &mut Cursor<'a>) -> Result<Self, ReadError> {
        let planes: &[Plane] = cursor.read_array(PLANE_COUNT)?;
        let bundle_count = planes
            .iter()
            .map(|plane| plane.bundle_range().end)
            .max()
            .unwrap_or_default();
        let bundles = cursor.read_array(bundle_count)?;
        Ok(Planes { planes, bundles })
    }
}
