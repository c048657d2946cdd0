use crate::validate::{Validate, ValidationReport};
use types::{Fix16, GlyphCode, LittleEndian, RleMetrics, Scalar};

/// A type that that can be written out as part of a font file.
pub trait FontWrite {
    /// Write our data into this [TableWriter].
    fn write_into(&self, writer: &mut TableWriter);
}

/// A buffer collecting the little-endian bytes of a structure.
///
/// IBMF structures are laid out back to back and reference each other only
/// through positions computed by the writer of the enclosing structure, so
/// unlike the tables of other font formats there is no offset graph to
/// resolve.
#[derive(Debug, Default)]
pub struct TableWriter {
    bytes: Vec<u8>,
}

/// Attempt to serialize a table.
///
/// If the table is malformed, this will return an Err([`ValidationReport`]),
/// otherwise it will return the bytes encoding the table.
pub fn dump_table<T: FontWrite + Validate>(table: &T) -> Result<Vec<u8>, ValidationReport> {
    table.validate()?;
    let mut writer = TableWriter::default();
    table.write_into(&mut writer);
    Ok(writer.into_data())
}

impl TableWriter {
    /// Write raw bytes into this table.
    ///
    /// The caller is responsible for ensuring bytes are in little-endian order.
    #[inline]
    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes)
    }

    /// Write zeros until the length is a multiple of four.
    pub fn pad_to_4(&mut self) {
        let padded = self.bytes.len().next_multiple_of(4);
        self.bytes.resize(padded, 0);
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Overwrite a previously written u32.
    ///
    /// Used to backpatch positions that are only known once the data they
    /// point at has been written.
    pub fn patch_u32(&mut self, pos: usize, value: u32) {
        self.bytes[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn into_data(self) -> Vec<u8> {
        self.bytes
    }
}

macro_rules! write_le_bytes {
    ($ty:ty) => {
        impl FontWrite for $ty {
            #[inline]
            fn write_into(&self, writer: &mut TableWriter) {
                writer.write_slice(&self.to_le_bytes())
            }
        }
    };
}

write_le_bytes!(u8);
write_le_bytes!(i8);
write_le_bytes!(u16);
write_le_bytes!(i16);
write_le_bytes!(u32);
write_le_bytes!(i32);

impl FontWrite for Fix16 {
    fn write_into(&self, writer: &mut TableWriter) {
        self.to_bits().write_into(writer)
    }
}

impl FontWrite for GlyphCode {
    fn write_into(&self, writer: &mut TableWriter) {
        self.to_u16().write_into(writer)
    }
}

impl FontWrite for RleMetrics {
    fn write_into(&self, writer: &mut TableWriter) {
        self.to_bits().write_into(writer)
    }
}

impl<T: Scalar> FontWrite for LittleEndian<T> {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_slice(self.le_bytes())
    }
}

impl<T: FontWrite> FontWrite for [T] {
    fn write_into(&self, writer: &mut TableWriter) {
        self.iter().for_each(|item| item.write_into(writer))
    }
}

impl<T: FontWrite> FontWrite for Vec<T> {
    fn write_into(&self, writer: &mut TableWriter) {
        self.as_slice().write_into(writer)
    }
}

impl<T: FontWrite, const N: usize> FontWrite for [T; N] {
    fn write_into(&self, writer: &mut TableWriter) {
        self.as_slice().write_into(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian() {
        let mut writer = TableWriter::default();
        0x1234u16.write_into(&mut writer);
        Fix16::from_i32(-1).write_into(&mut writer);
        [1u8, 2, 3].write_into(&mut writer);
        writer.pad_to_4();
        assert_eq!(writer.into_data(), vec![0x34, 0x12, 0xC0, 0xFF, 1, 2, 3, 0]);
    }

    #[test]
    fn backpatch() {
        let mut writer = TableWriter::default();
        0u32.write_into(&mut writer);
        7u8.write_into(&mut writer);
        writer.patch_u32(0, writer.len() as u32);
        assert_eq!(writer.into_data(), vec![5, 0, 0, 0, 7]);
    }
}
