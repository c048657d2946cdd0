//! Building the plane and bundle tables of UTF32 fonts.

use read::tables::planes::{CodePointBundle, Plane, Planes, PLANE_COUNT};
use types::GlyphCode;

use crate::{
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

const PLANE_BITS: u32 = 16;

/// A code point that the plane tables cannot represent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaneTableError {
    /// Only the first four Unicode planes are supported.
    UnsupportedPlane(u32),
    /// More code points than there are glyph codes.
    TooManyCodePoints(usize),
}

impl std::fmt::Display for PlaneTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaneTableError::UnsupportedPlane(cp) => {
                write!(f, "U+{cp:04X} is outside of the supported planes")
            }
            PlaneTableError::TooManyCodePoints(count) => {
                write!(f, "{count} code points exceed the glyph code range")
            }
        }
    }
}

impl std::error::Error for PlaneTableError {}

/// The planes and bundles mapping code points to glyph codes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaneTable {
    pub planes: [Plane; PLANE_COUNT],
    pub bundles: Vec<CodePointBundle>,
}

impl PlaneTable {
    /// Builds the tables for a set of code points.
    ///
    /// Glyph codes are assigned in code point order, so the glyph code of a
    /// code point is its rank in the (deduplicated) set.
    pub fn from_code_points(
        code_points: impl IntoIterator<Item = u32>,
    ) -> Result<PlaneTable, PlaneTableError> {
        let mut code_points: Vec<_> = code_points.into_iter().collect();
        code_points.sort_unstable();
        code_points.dedup();
        if let Some(cp) = code_points
            .last()
            .filter(|cp| (**cp >> PLANE_BITS) as usize >= PLANE_COUNT)
        {
            return Err(PlaneTableError::UnsupportedPlane(*cp));
        }
        if code_points.len() > GlyphCode::MAX.to_usize() + 1 {
            return Err(PlaneTableError::TooManyCodePoints(code_points.len()));
        }

        let mut table = PlaneTable::default();
        let mut glyph_count = 0u16;
        let mut remaining = code_points.as_slice();
        for (plane_ix, plane) in table.planes.iter_mut().enumerate() {
            let split = remaining.partition_point(|cp| (cp >> PLANE_BITS) as usize == plane_ix);
            let (in_plane, rest) = remaining.split_at(split);
            remaining = rest;
            let first_bundle = table.bundles.len();
            let mut current: Option<(u16, u16)> = None;
            for cp in in_plane {
                let low = *cp as u16;
                current = match current {
                    Some((first, last)) if last.checked_add(1) == Some(low) => Some((first, low)),
                    Some((first, last)) => {
                        table.bundles.push(CodePointBundle::new(first, last));
                        Some((low, low))
                    }
                    None => Some((low, low)),
                };
            }
            if let Some((first, last)) = current {
                table.bundles.push(CodePointBundle::new(first, last));
            }
            *plane = Plane::new(
                first_bundle as u16,
                (table.bundles.len() - first_bundle) as u16,
                glyph_count,
            );
            glyph_count += in_plane.len() as u16;
        }
        Ok(table)
    }

    /// The number of glyph codes covered by the bundles.
    pub fn glyph_count(&self) -> usize {
        self.bundles.iter().map(|bundle| bundle.len() as usize).sum()
    }

    /// A read view of these tables, for translating code points.
    pub fn charmap(&self) -> Planes<'_> {
        Planes::new(&self.planes, &self.bundles)
    }
}

impl Validate for PlaneTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("PlaneTable", |ctx| {
            ctx.in_field("bundles", |ctx| {
                if let Err(error) = self.charmap().check_round_trip(self.glyph_count() as u16) {
                    ctx.report(error);
                }
            })
        })
    }
}

impl FontWrite for Plane {
    fn write_into(&self, writer: &mut TableWriter) {
        self.code_point_bundles_idx.write_into(writer);
        self.entries_count.write_into(writer);
        self.first_glyph_code.write_into(writer);
    }
}

impl FontWrite for CodePointBundle {
    fn write_into(&self, writer: &mut TableWriter) {
        self.first_code_point.write_into(writer);
        self.last_code_point.write_into(writer);
    }
}

impl FontWrite for PlaneTable {
    fn write_into(&self, writer: &mut TableWriter) {
        self.planes.write_into(writer);
        self.bundles.write_into(writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump_table;
    use pretty_assertions::assert_eq;
    use read::FontData;

    #[test]
    fn bundles_per_plane() {
        let table =
            PlaneTable::from_code_points([0x43, 0x41, 0x42, 0xE9, 0x2F800, 0x41, 0x1F600, 0x1F601])
                .unwrap();
        assert_eq!(
            table.planes,
            [
                Plane::new(0, 2, 0),
                Plane::new(2, 1, 4),
                Plane::new(3, 1, 6),
                Plane::new(4, 0, 7),
            ]
        );
        assert_eq!(
            table.bundles,
            vec![
                CodePointBundle::new(0x41, 0x43),
                CodePointBundle::new(0xE9, 0xE9),
                CodePointBundle::new(0xF600, 0xF601),
                CodePointBundle::new(0xF800, 0xF800),
            ]
        );
        assert_eq!(table.glyph_count(), 7);
        let charmap = table.charmap();
        assert_eq!(charmap.glyph_code(0xE9), GlyphCode::new(3));
        assert_eq!(charmap.glyph_code(0x1F601), GlyphCode::new(5));
        assert_eq!(charmap.code_point(GlyphCode::new(6)), Some(0x2F800));
        assert_eq!(charmap.glyph_code(0x20), GlyphCode::SPACE);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn plane_boundary_is_not_a_run() {
        let table = PlaneTable::from_code_points([0xFFFF, 0x10000]).unwrap();
        assert_eq!(table.bundles.len(), 2);
        assert_eq!(table.planes[1], Plane::new(1, 1, 1));
    }

    #[test]
    fn unsupported_plane() {
        assert_eq!(
            PlaneTable::from_code_points([0x41, 0xE0001]),
            Err(PlaneTableError::UnsupportedPlane(0xE0001))
        );
    }

    #[test]
    fn written_layout() {
        let table = PlaneTable::from_code_points(0x61..=0x7A).unwrap();
        let bytes = dump_table(&table).unwrap();
        assert_eq!(bytes.len(), 4 * 6 + 4);
        let mut cursor = FontData::new(&bytes).cursor();
        let planes: &[Plane] = cursor.read_array(PLANE_COUNT).unwrap();
        let bundles: &[CodePointBundle] = cursor.read_array(1).unwrap();
        assert_eq!(planes[3].code_point_bundles_idx(), 1);
        assert_eq!(bundles[0].last_code_point(), 0x7A);
        let charmap = Planes::new(planes, bundles);
        assert_eq!(charmap.glyph_code(0x62), GlyphCode::new(1));
    }
}
