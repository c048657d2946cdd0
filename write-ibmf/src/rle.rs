//! Run-length compression of glyph bitmaps.
//!
//! This is the inverse of [`read_ibmf::rle`]; see there for a description of
//! the packed format.

use read::{
    bitmap::Bitmap,
    rle::{two_nibble_max, REPEAT_COUNT, REPEAT_ONCE},
};
use types::RleMetrics;

/// The largest `dyn_f` that selects a compressed encoding.
const MAX_DYN_F: u8 = 13;

/// An element of the run stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chunk {
    /// A run of pixels of the current colour.
    Run(u32),
    /// The next completed row is repeated this many times.
    Repeat(u32),
}

/// The bitmap given to the encoder has no pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyBitmapError;

impl std::fmt::Display for EmptyBitmapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("cannot encode an empty bitmap")
    }
}

impl std::error::Error for EmptyBitmapError {}

/// A compressed bitmap along with its packing parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedBitmap {
    pub data: Vec<u8>,
    pub metrics: RleMetrics,
}

/// Compresses a bitmap.
///
/// Any non-zero pixel is black. The packing parameter producing the smallest
/// output is chosen; if even that would be larger than one bit per pixel the
/// bitmap is stored uncompressed.
pub fn encode(bitmap: &Bitmap) -> Result<EncodedBitmap, EmptyBitmapError> {
    if bitmap.is_empty() {
        return Err(EmptyBitmapError);
    }
    let bitmap = bitmap.to_monochrome();
    let (first_is_black, chunks) = chunks(&bitmap);
    let (dyn_f, nibbles) = best_dyn_f(&chunks);
    let pixel_count = bitmap.width() as usize * bitmap.height() as usize;
    let raw_len = pixel_count.div_ceil(8);
    if nibbles.div_ceil(2) > raw_len {
        let mut data = vec![0u8; raw_len];
        for (ix, pixel) in bitmap.pixels().iter().enumerate() {
            if *pixel != 0 {
                data[ix >> 3] |= 0x80 >> (ix & 7);
            }
        }
        return Ok(EncodedBitmap {
            data,
            metrics: RleMetrics::new(RleMetrics::RAW_DYN_F, first_is_black),
        });
    }
    Ok(EncodedBitmap {
        data: pack(&chunks, dyn_f),
        metrics: RleMetrics::new(dyn_f, first_is_black),
    })
}

fn pack(chunks: &[Chunk], dyn_f: u8) -> Vec<u8> {
    let mut writer = NibbleWriter::default();
    for chunk in chunks {
        match *chunk {
            Chunk::Run(n) => writer.number(n, dyn_f),
            Chunk::Repeat(1) => writer.push(REPEAT_ONCE),
            Chunk::Repeat(n) => {
                writer.push(REPEAT_COUNT);
                writer.number(n, dyn_f);
            }
        }
    }
    writer.finish()
}

/// Splits a monochrome bitmap into runs, and the colour of the first one.
///
/// Consecutive identical rows are folded into a [`Chunk::Repeat`], except
/// for a row that is uniformly the colour of the pixel preceding it: such a
/// row has no colour change that could carry the repeat.
pub fn chunks(bitmap: &Bitmap) -> (bool, Vec<Chunk>) {
    let pixels = bitmap.pixels();
    let first_is_black = pixels.first().is_some_and(|p| *p != 0);
    let mut black = first_is_black;
    let mut run = 0;
    let mut pending = None;
    let mut chunks = Vec::new();
    for (row, repeat) in effective_rows(bitmap) {
        if repeat > 0 {
            if run == 0 {
                chunks.push(Chunk::Repeat(repeat));
            } else {
                pending = Some(repeat);
            }
        }
        for pixel in row {
            if (*pixel != 0) == black {
                run += 1;
                continue;
            }
            chunks.push(Chunk::Run(run));
            if let Some(repeat) = pending.take() {
                chunks.push(Chunk::Repeat(repeat));
            }
            black = !black;
            run = 1;
        }
        debug_assert!(pending.is_none(), "repeat without a colour change");
    }
    chunks.push(Chunk::Run(run));
    (first_is_black, chunks)
}

/// The rows that are emitted, each with the number of following copies.
fn effective_rows(bitmap: &Bitmap) -> Vec<(&[u8], u32)> {
    let height = bitmap.height();
    let mut rows = Vec::new();
    let mut prev_last = None;
    let mut y = 0;
    while let Some(row) = bitmap.row(y) {
        let mut repeat = 0;
        while y + 1 + repeat < height && bitmap.row(y + 1 + repeat) == Some(row) {
            repeat += 1;
        }
        let uniform = row.iter().all(|p| Some(p) == row.first());
        if uniform && row.first() == prev_last {
            repeat = 0;
        }
        rows.push((row, repeat));
        prev_last = row.last();
        y += 1 + repeat;
    }
    rows
}

/// The number of nibbles of a packed number.
fn number_len(n: u32, dyn_f: u8) -> usize {
    if (1..=dyn_f as u32).contains(&n) {
        1
    } else if n <= two_nibble_max(dyn_f) {
        2
    } else {
        2 * hex_digits(large_value(n, dyn_f)) - 1
    }
}

fn large_value(n: u32, dyn_f: u8) -> u32 {
    n - two_nibble_max(dyn_f) + 15
}

fn hex_digits(value: u32) -> usize {
    (32 - value.leading_zeros()).div_ceil(4).max(1) as usize
}

/// The number of nibbles needed to encode `chunks` with `dyn_f`.
pub fn encoded_size(chunks: &[Chunk], dyn_f: u8) -> usize {
    chunks
        .iter()
        .map(|chunk| match *chunk {
            Chunk::Run(n) => number_len(n, dyn_f),
            Chunk::Repeat(1) => 1,
            Chunk::Repeat(n) => 1 + number_len(n, dyn_f),
        })
        .sum()
}

/// The `dyn_f` giving the smallest encoding, with its size in nibbles.
///
/// Ties go to the smallest value.
pub fn best_dyn_f(chunks: &[Chunk]) -> (u8, usize) {
    (0..=MAX_DYN_F)
        .map(|dyn_f| (dyn_f, encoded_size(chunks, dyn_f)))
        .min_by_key(|(dyn_f, size)| (*size, *dyn_f))
        .unwrap_or((0, 0))
}

#[derive(Default)]
struct NibbleWriter {
    data: Vec<u8>,
    odd: bool,
}

impl NibbleWriter {
    fn push(&mut self, nibble: u8) {
        if self.odd {
            if let Some(last) = self.data.last_mut() {
                *last |= nibble & 0x0F;
            }
        } else {
            self.data.push(nibble << 4);
        }
        self.odd = !self.odd;
    }

    fn number(&mut self, n: u32, dyn_f: u8) {
        if (1..=dyn_f as u32).contains(&n) {
            self.push(n as u8);
        } else if n <= two_nibble_max(dyn_f) {
            let m = n - dyn_f as u32 - 1;
            self.push(((m >> 4) + dyn_f as u32 + 1) as u8);
            self.push((m & 0x0F) as u8);
        } else {
            let value = large_value(n, dyn_f);
            let digits = hex_digits(value);
            for _ in 1..digits {
                self.push(0);
            }
            for ix in (0..digits).rev() {
                self.push(((value >> (4 * ix)) & 0x0F) as u8);
            }
        }
    }

    fn finish(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use read::rle::{decode, RleBitmap};
    use rstest::rstest;

    fn round_trip(bitmap: &Bitmap) -> EncodedBitmap {
        let encoded = encode(bitmap).unwrap();
        let rle = RleBitmap {
            data: &encoded.data,
            width: bitmap.width(),
            height: bitmap.height(),
            metrics: encoded.metrics,
        };
        assert_eq!(&decode(&rle).unwrap(), bitmap);
        encoded
    }

    #[test]
    fn single_black_pixel() {
        let encoded = round_trip(&Bitmap::from_ascii_rows(&["#"]));
        assert!(encoded.metrics.first_is_black());
        assert!(encoded.data.len() <= 1);
        assert_eq!(encoded.data, vec![0x10]);
        assert_eq!(encoded.metrics.dyn_f(), 1);
    }

    #[test]
    fn empty_bitmap() {
        assert_eq!(encode(&Bitmap::new(0, 4)), Err(EmptyBitmapError));
        assert_eq!(encode(&Bitmap::new(4, 0)), Err(EmptyBitmapError));
    }

    #[test]
    fn repeated_rows_become_repeat_chunks() {
        let bitmap = Bitmap::from_ascii_rows(&["#..", "#..", "#..", "..."]);
        let (first_is_black, chunks) = chunks(&bitmap);
        assert!(first_is_black);
        assert_eq!(
            chunks,
            vec![Chunk::Repeat(2), Chunk::Run(1), Chunk::Run(5)]
        );
        round_trip(&bitmap);
    }

    #[test]
    fn repeat_follows_the_row_change() {
        let bitmap = Bitmap::from_ascii_rows(&["..", ".#", ".#"]);
        let (_, chunks) = chunks(&bitmap);
        assert_eq!(
            chunks,
            vec![Chunk::Run(3), Chunk::Repeat(1), Chunk::Run(1)]
        );
        round_trip(&bitmap);
    }

    #[test]
    fn uniform_rows_continuing_a_run_are_not_repeated() {
        let bitmap = Bitmap::from_ascii_rows(&["#.", "..", "..", ".."]);
        let (_, chunks) = chunks(&bitmap);
        assert_eq!(chunks, vec![Chunk::Run(1), Chunk::Run(7)]);
        round_trip(&bitmap);
    }

    /// Runs over every pixel, with no rows folded.
    fn unfolded_runs(bitmap: &Bitmap) -> Vec<Chunk> {
        let mut runs = Vec::new();
        let mut pixels = bitmap.pixels().iter().peekable();
        while let Some(pixel) = pixels.next() {
            let mut run = 1;
            while pixels.next_if(|next| **next == *pixel).is_some() {
                run += 1;
            }
            runs.push(Chunk::Run(run));
        }
        runs
    }

    fn decode_packed(bitmap: &Bitmap, data: &[u8], dyn_f: u8, first_is_black: bool) -> Bitmap {
        let rle = RleBitmap {
            data,
            width: bitmap.width(),
            height: bitmap.height(),
            metrics: RleMetrics::new(dyn_f, first_is_black),
        };
        decode(&rle).unwrap()
    }

    #[test]
    fn repetition_does_not_change_the_image() {
        // three identical middle rows are folded into one plus a repeat of two
        let bitmap = Bitmap::from_ascii_rows(&[".##.", "#..#", "#..#", "#..#", ".##."]);
        let (first_is_black, folded) = chunks(&bitmap);
        assert!(folded.contains(&Chunk::Repeat(2)));
        let unfolded = unfolded_runs(&bitmap);
        assert!(!unfolded.iter().any(|chunk| matches!(chunk, Chunk::Repeat(_))));
        assert!(encoded_size(&folded, 2) < encoded_size(&unfolded, 2));

        for dyn_f in 0..RleMetrics::RAW_DYN_F {
            let with_repeats = decode_packed(&bitmap, &pack(&folded, dyn_f), dyn_f, first_is_black);
            let without = decode_packed(&bitmap, &pack(&unfolded, dyn_f), dyn_f, first_is_black);
            assert_eq!(with_repeats, without, "dyn_f {dyn_f}");
            assert_eq!(with_repeats, bitmap);
        }
    }

    #[test]
    fn large_runs() {
        let mut bitmap = Bitmap::new(200, 200);
        bitmap.set_pixel(199, 199, 0xFF);
        let encoded = round_trip(&bitmap);
        assert!(!encoded.metrics.is_raw());
    }

    #[test]
    fn noise_is_stored_raw() {
        let bitmap = Bitmap::from_ascii_rows(&["#.#.#.#.", ".#.#.#.#"]);
        let encoded = round_trip(&bitmap);
        assert!(encoded.metrics.is_raw());
        assert_eq!(encoded.data, vec![0xAA, 0x55]);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(13, 2)]
    #[case(208, 2)]
    #[case(209, 3)]
    #[case(448, 3)]
    #[case(449, 5)]
    #[case(4000, 5)]
    #[case(4303, 7)]
    fn packed_number_sizes(#[case] n: u32, #[case] expected: usize) {
        // dyn_f 0: one nibble numbers are never used
        let dyn_f = if n == 1 { 1 } else { 0 };
        assert_eq!(number_len(n, dyn_f), expected);
        let mut writer = NibbleWriter::default();
        writer.number(n, dyn_f);
        assert_eq!(writer.data.len(), expected.div_ceil(2));
    }

    #[test]
    fn chosen_dyn_f_is_optimal() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let width = rng.gen_range(1..12);
            let height = rng.gen_range(1..12);
            let density: f64 = rng.gen();
            let mut bitmap = Bitmap::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    if rng.gen_bool(density) {
                        bitmap.set_pixel(x, y, 0xFF);
                    }
                }
            }
            let (_, chunks) = chunks(&bitmap);
            let (best, size) = best_dyn_f(&chunks);
            for dyn_f in 0..=MAX_DYN_F {
                let other = encoded_size(&chunks, dyn_f);
                assert!(other >= size, "dyn_f {dyn_f} beats {best}");
                if other == size {
                    assert!(dyn_f >= best);
                }
            }
            round_trip(&bitmap);
        }
    }

    #[test]
    fn gray_pixels_are_black() {
        let mut bitmap = Bitmap::new(2, 1);
        bitmap.set_pixel(0, 0, 0x40);
        let encoded = encode(&bitmap).unwrap();
        let rle = RleBitmap {
            data: &encoded.data,
            width: 2,
            height: 1,
            metrics: encoded.metrics,
        };
        assert_eq!(decode(&rle).unwrap(), Bitmap::from_ascii_rows(&["#."]));
    }
}
