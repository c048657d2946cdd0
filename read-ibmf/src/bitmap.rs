//! Uncompressed glyph bitmaps.
//!
//! [`Bitmap`] is the eight bit per pixel representation used while a glyph is
//! being edited. [`PackedBitmap`] stores one bit per pixel and is the natural
//! target when rendering to monochrome displays. Both implement [`Canvas`],
//! which is what the decoder writes to.

/// The intensity of a black pixel in a [`Bitmap`].
pub const BLACK_PIXEL: u8 = 0xFF;

/// The intensity of a background pixel in a [`Bitmap`].
pub const WHITE_PIXEL: u8 = 0x00;

/// A destination for decoded pixels.
///
/// The pixel resolution of a canvas is part of its type, so the choice
/// between one and eight bits per pixel is made when the decoder is
/// instantiated rather than on each call.
pub trait Canvas {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Returns `true` if the pixel at (`x`, `y`) is black.
    ///
    /// Coordinates are guaranteed to be in bounds by the caller.
    fn is_black(&self, x: u32, y: u32) -> bool;

    /// Sets the pixel at (`x`, `y`).
    ///
    /// Coordinates are guaranteed to be in bounds by the caller.
    fn put(&mut self, x: u32, y: u32, black: bool);

    /// Copies `len` pixels of row `src_y` starting at `x` into row `dst_y`.
    fn copy_row(&mut self, x: u32, len: u32, src_y: u32, dst_y: u32) {
        for col in x..x + len {
            let black = self.is_black(col, src_y);
            self.put(col, dst_y, black);
        }
    }
}

/// A glyph bitmap with one byte per pixel.
///
/// A value of zero is background; anything else is treated as ink.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Creates a blank bitmap of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Bitmap {
            width,
            height,
            pixels: vec![WHITE_PIXEL; width as usize * height as usize],
        }
    }

    /// Creates a bitmap from row-major pixel intensities.
    ///
    /// Returns `None` if `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Bitmap {
            width,
            height,
            pixels,
        })
    }

    /// Creates a bitmap from rows of text, where `#` marks an inked pixel.
    ///
    /// Rows are padded with background pixels to the length of the longest one.
    pub fn from_ascii_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as u32;
        let mut bitmap = Bitmap::new(width, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    bitmap.set_pixel(x as u32, y as u32, BLACK_PIXEL);
                }
            }
        }
        bitmap
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` if the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        let start = y as usize * self.width as usize;
        (y < self.height).then(|| &self.pixels[start..start + self.width as usize])
    }

    /// Returns the pixel at (`x`, `y`), or `None` if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        (x < self.width && y < self.height)
            .then(|| self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Sets the pixel at (`x`, `y`); out of bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = value;
        }
    }

    /// Returns a copy of this bitmap with every inked pixel set to [`BLACK_PIXEL`].
    pub fn to_monochrome(&self) -> Bitmap {
        Bitmap {
            width: self.width,
            height: self.height,
            pixels: self
                .pixels
                .iter()
                .map(|p| if *p == WHITE_PIXEL { WHITE_PIXEL } else { BLACK_PIXEL })
                .collect(),
        }
    }
}

impl Canvas for Bitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn is_black(&self, x: u32, y: u32) -> bool {
        self.pixels[y as usize * self.width as usize + x as usize] != WHITE_PIXEL
    }

    fn put(&mut self, x: u32, y: u32, black: bool) {
        self.pixels[y as usize * self.width as usize + x as usize] =
            if black { BLACK_PIXEL } else { WHITE_PIXEL };
    }

    fn copy_row(&mut self, x: u32, len: u32, src_y: u32, dst_y: u32) {
        let width = self.width as usize;
        let src = src_y as usize * width + x as usize;
        let dst = dst_y as usize * width + x as usize;
        self.pixels.copy_within(src..src + len as usize, dst);
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Bitmap {}x{}", self.width, self.height)?;
        for y in 0..self.height {
            let row = self.row(y).unwrap_or_default();
            let line: String = row
                .iter()
                .map(|p| if *p == WHITE_PIXEL { '.' } else { '#' })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// A bitmap with one bit per pixel.
///
/// Each row starts on a byte boundary; the most significant bit of a byte is
/// the leftmost pixel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackedBitmap {
    width: u32,
    height: u32,
    pitch: usize,
    data: Vec<u8>,
}

impl PackedBitmap {
    /// Creates a blank bitmap of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        let pitch = (width as usize).div_ceil(8);
        PackedBitmap {
            width,
            height,
            pitch,
            data: vec![0; pitch * height as usize],
        }
    }

    /// Bytes per row.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// The packed rows.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Expands to an eight bit per pixel bitmap.
    pub fn to_bitmap(&self) -> Bitmap {
        let mut bitmap = Bitmap::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_black(x, y) {
                    bitmap.set_pixel(x, y, BLACK_PIXEL);
                }
            }
        }
        bitmap
    }

    fn index(&self, x: u32, y: u32) -> (usize, u8) {
        (
            y as usize * self.pitch + (x as usize >> 3),
            0x80 >> (x & 7),
        )
    }
}

impl Canvas for PackedBitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn is_black(&self, x: u32, y: u32) -> bool {
        let (ix, mask) = self.index(x, y);
        self.data[ix] & mask != 0
    }

    fn put(&mut self, x: u32, y: u32, black: bool) {
        let (ix, mask) = self.index(x, y);
        if black {
            self.data[ix] |= mask;
        } else {
            self.data[ix] &= !mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_rows() {
        let bitmap = Bitmap::from_ascii_rows(&["#.#", ".#"]);
        assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
        assert_eq!(bitmap.row(0), Some([0xFF, 0, 0xFF].as_slice()));
        assert_eq!(bitmap.row(1), Some([0, 0xFF, 0].as_slice()));
        assert_eq!(bitmap.row(2), None);
    }

    #[test]
    fn packed_matches_gray() {
        let bitmap = Bitmap::from_ascii_rows(&["#........#", ".########."]);
        let mut packed = PackedBitmap::new(10, 2);
        for y in 0..2 {
            for x in 0..10 {
                packed.put(x, y, bitmap.is_black(x, y));
            }
        }
        assert_eq!(packed.pitch(), 2);
        assert_eq!(packed.data(), &[0x80, 0x40, 0x7F, 0x80]);
        assert_eq!(packed.to_bitmap(), bitmap);
    }

    #[test]
    fn copy_row_within_bitmap() {
        let mut bitmap = Bitmap::from_ascii_rows(&["##.#", "...."]);
        bitmap.copy_row(1, 3, 0, 1);
        assert_eq!(bitmap.row(1), Some([0, 0xFF, 0, 0xFF].as_slice()));
    }
}
