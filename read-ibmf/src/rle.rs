//! Decoding of run-length compressed glyph bitmaps.
//!
//! Glyph bitmaps are stored using a nibble oriented packing closely related
//! to the one of TeX's PK fonts. The bitmap is read left to right, top to
//! bottom, as a sequence of alternating white and black runs. Each run length
//! is a *packed number* whose encoding depends on the per-glyph parameter
//! `dyn_f`:
//!
//! | first nibble        | meaning                                              |
//! |---------------------|------------------------------------------------------|
//! | `0`                 | large number, hex digits follow (see below)          |
//! | `1..=dyn_f`         | the run length itself                                |
//! | `dyn_f+1..=13`      | two nibble number                                    |
//! | `14`                | a repeat count follows, as a packed number           |
//! | `15`                | repeat count of one                                  |
//!
//! A repeat count applies to the next row completed by the decoder: once that
//! row is filled it is duplicated `count` more times.
//!
//! A `dyn_f` of 14 means the glyph is not compressed at all and is stored as
//! one bit per pixel, rows packed back to back.

use types::RleMetrics;

use crate::bitmap::{Bitmap, Canvas};

/// Nibble introducing a repeat count.
pub const REPEAT_COUNT: u8 = 14;

/// Nibble standing for a repeat count of one.
pub const REPEAT_ONCE: u8 = 15;

/// The largest run length that fits in two nibbles for the given `dyn_f`.
pub const fn two_nibble_max(dyn_f: u8) -> u32 {
    208 - 15 * dyn_f as u32
}

/// The compressed form of a glyph bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RleBitmap<'a> {
    /// The packed bytes.
    pub data: &'a [u8],
    /// Width of the decompressed bitmap.
    pub width: u32,
    /// Height of the decompressed bitmap.
    pub height: u32,
    /// The packing parameters.
    pub metrics: RleMetrics,
}

/// An error that occurs when decoding a compressed bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The packed data ended before the bitmap was complete.
    InsufficientData,
    /// The decoded bitmap does not fit in the destination canvas.
    TargetOutOfBounds,
    /// A repeat count extends past the last row.
    RepeatOverflow,
    /// A run extends past the last pixel.
    ExcessData,
    /// The packing parameter is outside of `0..=14`.
    InvalidDynF(u8),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InsufficientData => write!(f, "insufficient data"),
            DecodeError::TargetOutOfBounds => write!(f, "target region outside of canvas"),
            DecodeError::RepeatOverflow => write!(f, "row repeat past the last row"),
            DecodeError::ExcessData => write!(f, "run past the last pixel"),
            DecodeError::InvalidDynF(dyn_f) => write!(f, "invalid packing parameter {dyn_f}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decodes a compressed bitmap into a new eight bit per pixel [`Bitmap`].
pub fn decode(rle: &RleBitmap) -> Result<Bitmap, DecodeError> {
    let mut bitmap = Bitmap::new(rle.width, rle.height);
    decode_into(rle, &mut bitmap, 0, 0)?;
    Ok(bitmap)
}

/// Decodes a compressed bitmap into `canvas`, with its top left corner at
/// (`x`, `y`).
///
/// Pixels of the canvas outside of the glyph's box are left untouched; the
/// whole box is written, background pixels included.
pub fn decode_into<C: Canvas + ?Sized>(
    rle: &RleBitmap,
    canvas: &mut C,
    x: u32,
    y: u32,
) -> Result<(), DecodeError> {
    let fits = x
        .checked_add(rle.width)
        .zip(y.checked_add(rle.height))
        .is_some_and(|(right, bottom)| right <= canvas.width() && bottom <= canvas.height());
    if !fits {
        return Err(DecodeError::TargetOutOfBounds);
    }
    if rle.width == 0 || rle.height == 0 {
        return Ok(());
    }
    let dyn_f = rle.metrics.dyn_f();
    match dyn_f {
        RleMetrics::RAW_DYN_F => decode_raw(rle, canvas, x, y),
        0..=13 => RunDecoder::new(rle, dyn_f).decode(canvas, x, y),
        other => Err(DecodeError::InvalidDynF(other)),
    }
}

fn decode_raw<C: Canvas + ?Sized>(
    rle: &RleBitmap,
    canvas: &mut C,
    x: u32,
    y: u32,
) -> Result<(), DecodeError> {
    let pixel_count = rle.width as usize * rle.height as usize;
    if rle.data.len() < pixel_count.div_ceil(8) {
        return Err(DecodeError::InsufficientData);
    }
    for ix in 0..pixel_count {
        let black = rle.data[ix >> 3] & (0x80 >> (ix & 7)) != 0;
        let col = (ix % rle.width as usize) as u32;
        let row = (ix / rle.width as usize) as u32;
        canvas.put(x + col, y + row, black);
    }
    Ok(())
}

/// Reads packed numbers from a nibble stream.
struct NibbleReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl NibbleReader<'_> {
    fn next(&mut self) -> Result<u8, DecodeError> {
        let byte = self
            .data
            .get(self.pos >> 1)
            .ok_or(DecodeError::InsufficientData)?;
        let nibble = if self.pos & 1 == 0 {
            byte >> 4
        } else {
            byte & 0x0F
        };
        self.pos += 1;
        Ok(nibble)
    }
}

/// A decoded element of the run stream.
enum Packed {
    Run(u32),
    Repeat(u32),
}

struct RunDecoder<'a> {
    nibbles: NibbleReader<'a>,
    dyn_f: u8,
    width: u32,
    height: u32,
    first_is_black: bool,
}

impl<'a> RunDecoder<'a> {
    fn new(rle: &RleBitmap<'a>, dyn_f: u8) -> Self {
        RunDecoder {
            nibbles: NibbleReader {
                data: rle.data,
                pos: 0,
            },
            dyn_f,
            width: rle.width,
            height: rle.height,
            first_is_black: rle.metrics.first_is_black(),
        }
    }

    /// Reads a plain packed number; repeat escapes are not allowed here.
    fn number(&mut self) -> Result<u32, DecodeError> {
        let dyn_f = self.dyn_f as u32;
        let first = self.nibbles.next()? as u32;
        if first == 0 {
            let mut zeros = 1;
            let mut value = loop {
                let nibble = self.nibbles.next()? as u32;
                if nibble != 0 {
                    break nibble;
                }
                zeros += 1;
                // u32 holds at most eight hex digits
                if zeros > 7 {
                    return Err(DecodeError::ExcessData);
                }
            };
            for _ in 0..zeros {
                value = (value << 4) | self.nibbles.next()? as u32;
            }
            (value - 15)
                .checked_add(two_nibble_max(self.dyn_f))
                .ok_or(DecodeError::ExcessData)
        } else if first <= dyn_f {
            Ok(first)
        } else if first < REPEAT_COUNT as u32 {
            let second = self.nibbles.next()? as u32;
            Ok(((first - dyn_f - 1) << 4) + second + dyn_f + 1)
        } else {
            Err(DecodeError::ExcessData)
        }
    }

    fn packed(&mut self) -> Result<Packed, DecodeError> {
        // peek without consuming: escapes are single nibbles
        let save = self.nibbles.pos;
        match self.nibbles.next()? {
            REPEAT_COUNT => self.number().map(Packed::Repeat),
            REPEAT_ONCE => Ok(Packed::Repeat(1)),
            _ => {
                self.nibbles.pos = save;
                self.number().map(Packed::Run)
            }
        }
    }

    fn decode<C: Canvas + ?Sized>(mut self, canvas: &mut C, x: u32, y: u32) -> Result<(), DecodeError> {
        let mut row = 0;
        let mut col = 0;
        let mut black = self.first_is_black;
        let mut repeat = 0;
        while row < self.height {
            let mut count = match self.packed()? {
                Packed::Repeat(n) => {
                    repeat = n;
                    continue;
                }
                Packed::Run(n) => n,
            };
            while count > 0 {
                if row >= self.height {
                    return Err(DecodeError::ExcessData);
                }
                let take = count.min(self.width - col);
                for c in col..col + take {
                    canvas.put(x + c, y + row, black);
                }
                col += take;
                count -= take;
                if col == self.width {
                    for _ in 0..repeat {
                        row += 1;
                        if row >= self.height {
                            return Err(DecodeError::RepeatOverflow);
                        }
                        canvas.copy_row(x, self.width, y + row - 1, y + row);
                    }
                    repeat = 0;
                    row += 1;
                    col = 0;
                }
            }
            black = !black;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::PackedBitmap;
    use pretty_assertions::assert_eq;

    fn rle(data: &[u8], width: u32, height: u32, dyn_f: u8, black: bool) -> RleBitmap<'_> {
        RleBitmap {
            data,
            width,
            height,
            metrics: RleMetrics::new(dyn_f, black),
        }
    }

    #[test]
    fn single_black_pixel() {
        let bitmap = decode(&rle(&[0x10], 1, 1, 1, true)).unwrap();
        assert_eq!(bitmap, Bitmap::from_ascii_rows(&["#"]));
    }

    #[test]
    fn two_nibble_runs() {
        // dyn_f 0: 20 white = ((20-1) >> 4) + 1 = 2, (20-1) & 15 = 3
        // then 5 black = 1, 4
        let bitmap = decode(&rle(&[0x23, 0x14], 5, 5, 0, false)).unwrap();
        let expected = Bitmap::from_ascii_rows(&[".....", ".....", ".....", ".....", "#####"]);
        assert_eq!(bitmap, expected);
    }

    #[test]
    fn large_number() {
        // 300 white pixels with dyn_f 13: two nibble max is 13, so
        // j = 300 - 13 + 15 = 302 = 0x12E, written as 0 0 1 2 E
        let bitmap = decode(&rle(&[0x00, 0x12, 0xE0], 30, 10, 13, false)).unwrap();
        assert!(bitmap.pixels().iter().all(|p| *p == 0));
    }

    #[test]
    fn repeated_rows() {
        // "#..", repeated twice, then "..."
        // dyn_f 5: repeat-count escape (14, 2), black 1, then white 2 + 3;
        // duplicated rows are not part of any run
        let data = [0xE2, 0x15];
        let bitmap = decode(&rle(&data, 3, 4, 5, true)).unwrap();
        let expected = Bitmap::from_ascii_rows(&["#..", "#..", "#..", "..."]);
        assert_eq!(bitmap, expected);
    }

    #[test]
    fn raw_bits() {
        // 3x3 checkerboard, rows packed back to back
        let data = [0b1010_1010, 0b1000_0000];
        let bitmap = decode(&rle(&data, 3, 3, RleMetrics::RAW_DYN_F, true)).unwrap();
        let expected = Bitmap::from_ascii_rows(&["#.#", ".#.", "#.#"]);
        assert_eq!(bitmap, expected);
    }

    #[test]
    fn truncated_stream() {
        assert_eq!(
            decode(&rle(&[0x23], 5, 5, 0, false)),
            Err(DecodeError::InsufficientData)
        );
        assert_eq!(
            decode(&rle(&[0xAA], 3, 3, RleMetrics::RAW_DYN_F, false)),
            Err(DecodeError::InsufficientData)
        );
    }

    #[test]
    fn repeat_past_last_row() {
        // repeat twice on a two row bitmap
        assert_eq!(
            decode(&rle(&[0xE2, 0x20], 1, 2, 5, true)),
            Err(DecodeError::RepeatOverflow)
        );
    }

    #[test]
    fn target_must_fit() {
        let mut canvas = PackedBitmap::new(4, 4);
        let glyph = rle(&[0x10], 1, 1, 1, true);
        assert_eq!(
            decode_into(&glyph, &mut canvas, 4, 0),
            Err(DecodeError::TargetOutOfBounds)
        );
        decode_into(&glyph, &mut canvas, 3, 3).unwrap();
        assert!(canvas.is_black(3, 3));
    }

    #[test]
    fn invalid_dyn_f() {
        assert_eq!(
            decode(&rle(&[0x10], 1, 1, 15, true)),
            Err(DecodeError::InvalidDynF(15))
        );
    }
}
