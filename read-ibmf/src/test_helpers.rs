//! small utilities used in tests

use crate::FontData;
use types::Scalar;

/// A convenience type for generating a buffer of little-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct LeBuffer {
    data: Vec<u8>,
}

impl LeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// Overwrite the bytes at `offset`.
    pub fn write_at(&mut self, offset: usize, item: impl Scalar) {
        let raw = item.to_raw();
        let new_data: &[u8] = raw.as_ref();
        if self.data.len() < offset + new_data.len() {
            panic!("not enough room left in buffer for the requested write.");
        }
        self.data[offset..offset + new_data.len()].copy_from_slice(new_data);
    }

    pub fn font_data(&self) -> FontData {
        FontData::new(&self.data)
    }
}

impl std::ops::Deref for LeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
