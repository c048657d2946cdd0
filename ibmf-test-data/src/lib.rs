//! Test data shared between the ibmf crates.
//!
//! Glyph bitmaps are given as rows of `#` (black) and `.` (white), the same
//! notation accepted by `Bitmap::from_ascii_rows`.

/// The bitmaps of [`UTF32_TWO_FACES`], in glyph code order.
pub mod glyphs {
    pub static A_8PT: &[&str] = &[".#.", "#.#", "###", "#.#"];
    pub static V_8PT: &[&str] = &["#.#", "#.#", ".#."];
    pub static E_ACUTE_8PT: &[&str] = &["..#", ".#.", "###", "#..", ".##"];

    #[rustfmt::skip]
    pub static A_10PT: &[&str] = &[
        "...##...",
        "...##...",
        "..####..",
        "..#..#..",
        ".######.",
        ".######.",
        "##....##",
        "##....##",
    ];

    #[rustfmt::skip]
    pub static V_10PT: &[&str] = &[
        "##....##",
        "##....##",
        "##....##",
        ".##..##.",
        ".##..##.",
        "..####..",
        "..####..",
        "...##...",
    ];

    #[rustfmt::skip]
    pub static E_ACUTE_10PT: &[&str] = &[
        "....##..",
        "...##...",
        "........",
        ".######.",
        "##....##",
        "########",
        "##......",
        ".#######",
    ];
}

/// A UTF32 font with 'A', 'V' and 'é' in an 8pt and a 10pt face.
///
/// 'A' and 'V' kern by -1 against each other; 'é' has no program.
#[rustfmt::skip]
pub static UTF32_TWO_FACES: &[u8] = &[
    0x49, 0x42, 0x4D, 0x46, 0x02, 0x24,                           // marker, 2 faces, version 4 UTF32
    0x08, 0x0A,                                                   // point sizes
    0x34, 0x00, 0x00, 0x00, 0x88, 0x00, 0x00, 0x00,               // face offsets 52, 136
    0x00, 0x00, 0x03, 0x00, 0x00, 0x00,                           // plane 0: bundles 0..3, first glyph 0
    0x03, 0x00, 0x00, 0x00, 0x03, 0x00,                           // plane 1: empty
    0x03, 0x00, 0x00, 0x00, 0x03, 0x00,                           // plane 2: empty
    0x03, 0x00, 0x00, 0x00, 0x03, 0x00,                           // plane 3: empty
    0x41, 0x00, 0x41, 0x00,                                       // bundle 'A'
    0x56, 0x00, 0x56, 0x00,                                       // bundle 'V'
    0xE9, 0x00, 0xE9, 0x00,                                       // bundle 'é'
    0x08, 0x0A, 0x4B, 0x00,                                       // face 0: point size 8, line height 10, 75 dpi
    0x00, 0x01, 0x00, 0x02, 0x00, 0x00,                           // x height, em size, slant correction
    0x02, 0x03, 0x03, 0x00, 0x02, 0x00, 0x06, 0x00, 0x00, 0x00,   // descender 2, space 3, 3 glyphs, 2 steps, 6 pool bytes
    0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, // pool indexes 0, 2, 4
    0x03, 0x04, 0x00, 0x03, 0x02, 0x00,                           // 'A' 3x4 at (0, 3), 2 byte packet
    0x00, 0x01, 0x0E, 0x00, 0x00, 0x00,                           // advance 4, raw, pgm 0, main code 0
    0x03, 0x03, 0x00, 0x02, 0x02, 0x00,                           // 'V' 3x3 at (0, 2), 2 byte packet
    0x00, 0x01, 0x1E, 0x01, 0x01, 0x00,                           // advance 4, raw, first run black, pgm 1, main code 1
    0x03, 0x05, 0x00, 0x04, 0x02, 0x00,                           // 'é' 3x5 at (0, 4), 2 byte packet
    0x00, 0x01, 0x0E, 0xFF, 0x02, 0x00,                           // advance 4, raw, no pgm, main code 2
    0x57, 0xD0, 0xB5, 0x00, 0x2B, 0xC6,                           // pixel pool
    0x00, 0x00,                                                   // padding
    0x01, 0x80, 0xC0, 0xBF,                                       // stop, 'V' kern -1
    0x00, 0x80, 0xC0, 0xBF,                                       // stop, 'A' kern -1
    0x0A, 0x0C, 0x4B, 0x00,                                       // face 1: point size 10, line height 12, 75 dpi
    0x40, 0x01, 0x80, 0x02, 0x00, 0x00,                           // x height, em size, slant correction
    0x02, 0x03, 0x03, 0x00, 0x02, 0x00, 0x16, 0x00, 0x00, 0x00,   // descender 2, space 3, 3 glyphs, 2 steps, 22 pool bytes
    0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, // pool indexes 0, 8, 16
    0x08, 0x08, 0x00, 0x08, 0x08, 0x00,                           // 'A' 8x8 at (0, 8), 8 byte packet
    0x40, 0x02, 0x0E, 0x00, 0x00, 0x00,                           // advance 9, raw, pgm 0, main code 0
    0x08, 0x08, 0x00, 0x08, 0x08, 0x00,                           // 'V' 8x8 at (0, 8), 8 byte packet
    0x40, 0x02, 0x15, 0x01, 0x01, 0x00,                           // advance 9, dyn_f 5, first run black, pgm 1, main code 1
    0x08, 0x08, 0x00, 0x08, 0x06, 0x00,                           // 'é' 8x8 at (0, 8), 6 byte packet
    0x40, 0x02, 0x0C, 0xFF, 0x02, 0x00,                           // advance 9, dyn_f 12, no pgm, main code 2
    0x18, 0x18, 0x3C, 0x24, 0x7E, 0x7E, 0xC3, 0xC3, 0xE2, 0x24, 0x2F, 0x12, // pixel pool
    0x22, 0x3F, 0x45, 0x23, 0x42, 0x52, 0xC6, 0x12, 0x4C, 0x77,
    0x00, 0x00,                                                   // padding
    0x01, 0x80, 0xC0, 0xBF,                                       // stop, 'V' kern -1
    0x00, 0x80, 0xC0, 0xBF,                                       // stop, 'A' kern -1
];

/// A backup of the 8pt 'V' of [`UTF32_TWO_FACES`].
#[rustfmt::skip]
pub static BACKUP_ONE_FACE: &[u8] = &[
    0x49, 0x42, 0x4D, 0x46, 0x01, 0xE4,                           // marker, 1 face, version 4 backup
    0x08, 0x00,                                                   // point size, padding
    0x0C, 0x00, 0x00, 0x00,                                       // face offset
    0x08, 0x0A, 0x4B, 0x00,                                       // face 0: point size 8, line height 10, 75 dpi
    0x00, 0x01, 0x00, 0x02, 0x00, 0x00,                           // x height, em size, slant correction
    0x02, 0x03, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,   // descender 2, space 3, 1 entry, no steps, 2 pool bytes
    0x56, 0x00, 0x00, 0x00,                                       // entry 'V'
    0x03, 0x03, 0x00, 0x02, 0x02, 0x00,                           // 3x3 at (0, 2), 2 byte packet
    0x00, 0x01, 0x1E, 0xFF, 0x01, 0x00,                           // advance 4, raw, first run black, main code 1
    0x00, 0x00, 0x01, 0x00,                                       // no ligatures, 1 kern
    0xB5, 0x00,                                                   // packet
    0x00, 0x00,                                                   // padding
    0x41, 0x00, 0x00, 0x00, 0xC0, 0xFF, 0x00, 0x00,               // kern 'A' -1
];

