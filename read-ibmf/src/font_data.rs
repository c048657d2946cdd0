//! raw font bytes

use std::ops::{Range, RangeBounds};

use bytemuck::AnyBitPattern;
use types::{FixedSize, Scalar};

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// Every read advances the position, including reads that fail, so that a
/// truncated structure is reported at the first missing field.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns self[pos..]
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData { bytes })
    }

    /// returns self[range]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    /// Read a scalar at the provided location in the data.
    pub fn read_at<T: Scalar + FixedSize>(&self, offset: usize) -> Result<T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.bytes
            .get(offset..end)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Interpret the bytes at the provided offset as a reference to `T`.
    ///
    /// Returns an error if the slice `offset..` is shorter than `T::RAW_BYTE_LEN`.
    pub fn read_ref_at<T: AnyBitPattern + FixedSize>(
        &self,
        offset: usize,
    ) -> Result<&'a T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.bytes
            .get(offset..end)
            .ok_or(ReadError::OutOfBounds)
            .and_then(|bytes| {
                bytemuck::try_from_bytes(bytes)
                    .map_err(|_| ReadError::MalformedData("unaligned record"))
            })
    }

    /// Interpret the bytes at `range` as a slice of `T`.
    ///
    /// Returns an error if `range` is out of bounds for the underlying data,
    /// or if the length of the range is not a multiple of `T::RAW_BYTE_LEN`.
    pub fn read_array<T: AnyBitPattern + FixedSize>(
        &self,
        range: Range<usize>,
    ) -> Result<&'a [T], ReadError> {
        let bytes = self
            .bytes
            .get(range.clone())
            .ok_or(ReadError::OutOfBounds)?;
        if bytes.len() % T::RAW_BYTE_LEN != 0 {
            return Err(ReadError::InvalidArrayLen);
        };
        bytemuck::try_cast_slice(bytes).map_err(|_| ReadError::InvalidArrayLen)
    }

    pub(crate) fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        self.bytes
            .get(..offset)
            .ok_or(ReadError::OutOfBounds)
            .map(|_| ())
    }

    /// Returns a cursor positioned at the start of the data.
    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// Returns a cursor positioned at `pos`.
    pub fn cursor_at(&self, pos: usize) -> Cursor<'a> {
        Cursor { pos, data: *self }
    }

    /// Return the data as a byte slice
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    /// The current position, relative to the start of the underlying data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Skip `n_bytes`.
    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    /// Skip forward to the next multiple of `alignment`.
    ///
    /// Padding bytes are not checked.
    pub fn align_to(&mut self, alignment: usize) {
        self.pos = self.pos.next_multiple_of(alignment);
    }

    /// Read a scalar and advance the cursor.
    pub fn read<T: Scalar + FixedSize>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
        temp
    }

    /// Read a fixed size record by reference and advance the cursor.
    pub fn read_ref<T: AnyBitPattern + FixedSize>(&mut self) -> Result<&'a T, ReadError> {
        let temp = self.data.read_ref_at(self.pos);
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
        temp
    }

    /// Read `len` items of `T` and advance the cursor.
    pub fn read_array<T: AnyBitPattern + FixedSize>(
        &mut self,
        len: usize,
    ) -> Result<&'a [T], ReadError> {
        let byte_len = len
            .checked_mul(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let end = self
            .pos
            .checked_add(byte_len)
            .ok_or(ReadError::OutOfBounds)?;
        let temp = self.data.read_array(self.pos..end);
        self.pos = end;
        temp
    }

    /// Read `len` raw bytes and advance the cursor.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        self.read_array::<u8>(len)
    }

    /// Return the current remaining data.
    pub fn remaining(&self) -> Option<FontData<'a>> {
        self.data.split_off(self.pos)
    }

    /// Returns `true` if the cursor is still in bounds of the underlying data.
    pub fn finish(&self) -> Result<(), ReadError> {
        self.data.check_in_bounds(self.pos)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::LittleEndian;

    #[test]
    fn cursor_reads_little_endian() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let data = FontData::new(&bytes);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<u16>().unwrap(), 0x0201);
        assert_eq!(cursor.read::<u32>().unwrap(), 0x0605_0403);
        assert!(cursor.read::<u8>().is_err());
    }

    #[test]
    fn arrays_must_be_exact() {
        let bytes = [0u8; 7];
        let data = FontData::new(&bytes);
        assert!(data.read_array::<LittleEndian<u16>>(0..6).is_ok());
        assert!(matches!(
            data.read_array::<LittleEndian<u16>>(0..5),
            Err(ReadError::InvalidArrayLen)
        ));
        assert!(matches!(
            data.read_array::<LittleEndian<u16>>(0..8),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn slice_any_range() {
        let bytes = [0u8, 1, 2, 3, 4];
        let data = FontData::new(&bytes);
        assert_eq!(data.slice(1..3).unwrap().as_bytes(), &[1, 2]);
        assert_eq!(data.slice(..=1).unwrap().as_bytes(), &[0, 1]);
        assert_eq!(data.slice(3..).unwrap().as_bytes(), &[3, 4]);
        assert!(data.slice(5..).unwrap().as_bytes().is_empty());
        assert!(data.slice(2..6).is_none());
    }

    #[test]
    fn align_cursor() {
        let data = FontData::new(&[0u8; 16]);
        let mut cursor = data.cursor_at(5);
        cursor.align_to(4);
        assert_eq!(cursor.position(), 8);
        cursor.align_to(4);
        assert_eq!(cursor.position(), 8);
    }
}
