//! The fixed alphabet of Latin fonts.
//!
//! Glyph codes `0x00..=0x0C` are the accent marks (grave, acute, circumflex,
//! tilde, diaeresis, double acute, ring, caron, breve, macron, dot above,
//! cedilla, ogonek), `0x0D..=0x20` punctuation and f-ligatures, `0x21..=0x7E`
//! ASCII and `0x7F..=0xAD` the remaining Latin-1 and Latin Extended-A letters
//! and symbols. Accented letters have no glyph of their own: their code
//! carries a base glyph in the low byte and a mark in bits 8-11, the mark
//! being drawn with accent glyph `mark - 1`.

use types::{GlyphCode, LATIN_GLYPH_CODE_MASK};

const SPACE: u16 = GlyphCode::SPACE.to_u16();
const TABLE_START: u32 = 0xA1;

/// Maps a code point to a Latin glyph code.
///
/// Code points outside the alphabet map to [`GlyphCode::SPACE`].
pub fn glyph_code(code_point: u32) -> GlyphCode {
    let raw = match code_point {
        0x21..=0x7E => code_point as u16,
        TABLE_START..=0x1FF => LATIN_TABLE[(code_point - TABLE_START) as usize],
        0x0237 => 0x1A,
        0x02C6 => 0x02,
        0x02C7 => 0x07,
        0x02CB => 0x00,
        0x02D8 => 0x08,
        0x02D9 => 0x0A,
        0x02DA => 0x06,
        0x02DB => 0x0C,
        0x02DC => 0x03,
        0x02DD => 0x05,
        0x1E9E => 0xAD,
        0x2013 => 0x15,
        0x2014 => 0x16,
        0x2018 => 0x17,
        0x2019 => 0x18,
        0x201A => 0x0D,
        0x201C => 0x10,
        0x201D => 0x11,
        0x201E => 0x12,
        0x2020 => 0x81,
        0x2021 => 0x82,
        0x2022 => 0x80,
        0x2026 => 0x7F,
        0x2030 => 0x83,
        0x2039 => 0x0E,
        0x203A => 0x0F,
        0x20AC => 0x20,
        0x2122 => 0x84,
        0xFB00 => 0x1B,
        0xFB01 => 0x1C,
        0xFB02 => 0x1D,
        0xFB03 => 0x1E,
        0xFB04 => 0x1F,
        _ => SPACE,
    };
    GlyphCode::new(raw)
}

/// Maps a Latin glyph code, composite or not, back to its code point.
pub fn code_point(glyph: GlyphCode) -> Option<u32> {
    if !glyph.is_glyph() {
        return None;
    }
    let raw = glyph.to_u16();
    if raw & !LATIN_GLYPH_CODE_MASK == 0 {
        return LATIN_CODE_POINTS.get(raw as usize).map(|cp| *cp as u32);
    }
    LATIN_TABLE
        .iter()
        .position(|entry| *entry == raw)
        .map(|ix| ix as u32 + TABLE_START)
}

// Latin-1 and Latin Extended-A, indexed from U+00A1.
#[rustfmt::skip]
static LATIN_TABLE: [u16; 351] = [
    0x0085, 0x0086, 0x0087, 0x7FFE, 0x0088, 0x7FFE, 0x0089, 0x0004,  // U+00A1
    0x008A, 0x7FFE, 0x0013, 0x008B, 0x002D, 0x008C, 0x0009, 0x008D,  // U+00A9
    0x008E, 0x7FFE, 0x7FFE, 0x0001, 0x008F, 0x0090, 0x0091, 0x000B,  // U+00B1
    0x7FFE, 0x7FFE, 0x0014, 0x7FFE, 0x7FFE, 0x7FFE, 0x0092, 0x0141,  // U+00B9
    0x0241, 0x0341, 0x0441, 0x0541, 0x0741, 0x0093, 0x0C43, 0x0145,  // U+00C1
    0x0245, 0x0345, 0x0545, 0x0149, 0x0249, 0x0349, 0x0549, 0x0094,  // U+00C9
    0x044E, 0x014F, 0x024F, 0x034F, 0x044F, 0x054F, 0x0095, 0x0096,  // U+00D1
    0x0155, 0x0255, 0x0355, 0x0555, 0x0259, 0x0097, 0x0098, 0x0161,  // U+00D9
    0x0261, 0x0361, 0x0461, 0x0561, 0x0761, 0x0099, 0x0C63, 0x0165,  // U+00E1
    0x0265, 0x0365, 0x0565, 0x0119, 0x0219, 0x0319, 0x0519, 0x009A,  // U+00E9
    0x046E, 0x016F, 0x026F, 0x036F, 0x046F, 0x056F, 0x009B, 0x009C,  // U+00F1
    0x0175, 0x0275, 0x0375, 0x0575, 0x0279, 0x009D, 0x0579, 0x0A41,  // U+00F9
    0x0A61, 0x0941, 0x0961, 0x0D41, 0x0D61, 0x0243, 0x0263, 0x0343,  // U+0101
    0x0363, 0x0B43, 0x0B63, 0x0843, 0x0863, 0x0844, 0x0864, 0x009E,  // U+0109
    0x009F, 0x0A45, 0x0A65, 0x0945, 0x0965, 0x0B45, 0x0B65, 0x0D45,  // U+0111
    0x0D65, 0x0845, 0x0865, 0x0347, 0x0367, 0x0947, 0x0967, 0x0B47,  // U+0119
    0x0B67, 0x0C47, 0x0C67, 0x0348, 0x0368, 0x00A0, 0x00A1, 0x0449,  // U+0121
    0x0419, 0x0A49, 0x0A19, 0x0949, 0x0919, 0x0D49, 0x0D19, 0x0B49,  // U+0129
    0x0019, 0x00A2, 0x00A3, 0x034A, 0x031A, 0x0C4B, 0x0C6B, 0x7FFE,  // U+0131
    0x024C, 0x026C, 0x0C4C, 0x0C6C, 0x084C, 0x086C, 0x7FFE, 0x7FFE,  // U+0139
    0x00A4, 0x00A5, 0x024E, 0x026E, 0x0C4E, 0x0C6E, 0x084E, 0x086E,  // U+0141
    0x7FFE, 0x00A6, 0x00A7, 0x0A4F, 0x0A6F, 0x094F, 0x096F, 0x064F,  // U+0149
    0x066F, 0x00A8, 0x00A9, 0x0252, 0x0272, 0x0C52, 0x0C72, 0x0852,  // U+0151
    0x0872, 0x0253, 0x0273, 0x0353, 0x0373, 0x0C53, 0x0C73, 0x0853,  // U+0159
    0x0873, 0x0C54, 0x0C74, 0x0854, 0x0874, 0x00AA, 0x00AB, 0x0455,  // U+0161
    0x0475, 0x0A55, 0x0A75, 0x0955, 0x0975, 0x0755, 0x0775, 0x0655,  // U+0169
    0x0675, 0x0D55, 0x0D75, 0x0357, 0x0377, 0x0359, 0x0379, 0x0559,  // U+0171
    0x025A, 0x027A, 0x0B5A, 0x0B7A, 0x085A, 0x087A, 0x00AC, 0x7FFE,  // U+0179
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+0181
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+0189
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+0191
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+0199
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+01A1
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+01A9
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+01B1
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+01B9
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+01C1
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x0841, 0x0861, 0x0849, 0x0819,  // U+01C9
    0x084F, 0x086F, 0x0855, 0x0875, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+01D1
    0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE,  // U+01D9
    0x7FFE, 0x0A93, 0x0A99, 0x7FFE, 0x7FFE, 0x0847, 0x0867, 0x084B,  // U+01E1
    0x086B, 0x0D4F, 0x0D6F, 0x7FFE, 0x7FFE, 0x7FFE, 0x7FFE, 0x081A,  // U+01E9
    0x7FFE, 0x7FFE, 0x7FFE, 0x0247, 0x0267, 0x7FFE, 0x7FFE, 0x014E,  // U+01F1
    0x016E, 0x7FFE, 0x7FFE, 0x0293, 0x0299, 0x0296, 0x029C,  // U+01F9
];

#[rustfmt::skip]
static LATIN_CODE_POINTS: [u16; 174] = [
    0x02CB, 0x00B4, 0x02C6, 0x02DC, 0x00A8, 0x02DD, 0x02DA, 0x02C7,  // 0x00
    0x02D8, 0x00AF, 0x02D9, 0x00B8, 0x02DB, 0x201A, 0x2039, 0x203A,  // 0x08
    0x201C, 0x201D, 0x201E, 0x00AB, 0x00BB, 0x2013, 0x2014, 0x2018,  // 0x10
    0x2019, 0x0131, 0x0237, 0xFB00, 0xFB01, 0xFB02, 0xFB03, 0xFB04,  // 0x18
    0x20AC, 0x0021, 0x0022, 0x0023, 0x0024, 0x0025, 0x0026, 0x0027,  // 0x20
    0x0028, 0x0029, 0x002A, 0x002B, 0x002C, 0x002D, 0x002E, 0x002F,  // 0x28
    0x0030, 0x0031, 0x0032, 0x0033, 0x0034, 0x0035, 0x0036, 0x0037,  // 0x30
    0x0038, 0x0039, 0x003A, 0x003B, 0x003C, 0x003D, 0x003E, 0x003F,  // 0x38
    0x0040, 0x0041, 0x0042, 0x0043, 0x0044, 0x0045, 0x0046, 0x0047,  // 0x40
    0x0048, 0x0049, 0x004A, 0x004B, 0x004C, 0x004D, 0x004E, 0x004F,  // 0x48
    0x0050, 0x0051, 0x0052, 0x0053, 0x0054, 0x0055, 0x0056, 0x0057,  // 0x50
    0x0058, 0x0059, 0x005A, 0x005B, 0x005C, 0x005D, 0x005E, 0x005F,  // 0x58
    0x0060, 0x0061, 0x0062, 0x0063, 0x0064, 0x0065, 0x0066, 0x0067,  // 0x60
    0x0068, 0x0069, 0x006A, 0x006B, 0x006C, 0x006D, 0x006E, 0x006F,  // 0x68
    0x0070, 0x0071, 0x0072, 0x0073, 0x0074, 0x0075, 0x0076, 0x0077,  // 0x70
    0x0078, 0x0079, 0x007A, 0x007B, 0x007C, 0x007D, 0x007E, 0x2026,  // 0x78
    0x2022, 0x2020, 0x2021, 0x2030, 0x2122, 0x00A1, 0x00A2, 0x00A3,  // 0x80
    0x00A5, 0x00A7, 0x00A9, 0x00AC, 0x00AE, 0x00B0, 0x00B1, 0x00B5,  // 0x88
    0x00B6, 0x00B7, 0x00BF, 0x00C6, 0x00D0, 0x00D7, 0x00D8, 0x00DE,  // 0x90
    0x00DF, 0x00E6, 0x00F0, 0x00F7, 0x00F8, 0x00FE, 0x0110, 0x0111,  // 0x98
    0x0126, 0x0127, 0x0132, 0x0133, 0x0141, 0x0142, 0x014A, 0x014B,  // 0xA0
    0x0152, 0x0153, 0x0166, 0x0167, 0x017F, 0x1E9E,  // 0xA8
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use types::LATIN_GLYPH_COUNT;

    #[test]
    fn ascii_is_identity() {
        for cp in 0x21..=0x7E {
            assert_eq!(glyph_code(cp), GlyphCode::new(cp as u16));
        }
        assert_eq!(glyph_code(0x20), GlyphCode::SPACE);
    }

    #[test]
    fn composites() {
        // é: 'e' with an acute accent
        let e_acute = glyph_code(0xE9);
        assert_eq!(e_acute.latin_base(), GlyphCode::new(b'e' as u16));
        assert_eq!(e_acute.latin_mark(), 2);
        // î uses the dotless i
        assert_eq!(glyph_code(0xEE).latin_base(), GlyphCode::new(0x19));
        assert_eq!(code_point(e_acute), Some(0xE9));
    }

    #[rstest]
    #[case::euro(0x20AC, 0x20)]
    #[case::fi_ligature(0xFB01, 0x1C)]
    #[case::ellipsis(0x2026, 0x7F)]
    #[case::soft_hyphen(0xAD, b'-' as u16)]
    fn named_punctuation(#[case] code_point: u32, #[case] glyph: u16) {
        assert_eq!(glyph_code(code_point), GlyphCode::new(glyph));
    }

    #[test]
    fn unmapped() {
        assert_eq!(glyph_code(0xA4), GlyphCode::SPACE);
        assert_eq!(glyph_code(0x1F600), GlyphCode::SPACE);
        assert_eq!(code_point(GlyphCode::SPACE), None);
    }

    #[test]
    fn every_glyph_has_a_code_point() {
        for raw in 0..LATIN_GLYPH_COUNT {
            let glyph = GlyphCode::new(raw);
            let cp = code_point(glyph).unwrap();
            assert_eq!(glyph_code(cp), glyph, "glyph {raw:#x} U+{cp:04X}");
        }
    }
}
