//! The file preamble, point size list and face offset table.

use types::{FixedSize, FontFormat, LittleEndian, IBMF_MARKER, IBMF_VERSION};

use crate::{Cursor, FontData, FontRead, ReadError};

/// The first six bytes of every IBMF file.
#[derive(Copy, Clone, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct Preamble {
    /// Always `IBMF`.
    pub marker: [u8; 4],
    pub face_count: u8,
    /// Version in bits 0-4, format in bits 5-7.
    pub bits: u8,
}

impl FixedSize for Preamble {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self>();
}

impl Preamble {
    const VERSION_MASK: u8 = 0x1F;
    const FORMAT_SHIFT: u8 = 5;

    /// Builds a preamble for the current version.
    pub fn new(face_count: u8, format: FontFormat) -> Self {
        Preamble {
            marker: IBMF_MARKER,
            face_count,
            bits: (format.to_u8() << Self::FORMAT_SHIFT) | IBMF_VERSION,
        }
    }

    pub fn face_count(&self) -> u8 {
        self.face_count
    }

    pub fn version(&self) -> u8 {
        self.bits & Self::VERSION_MASK
    }

    /// The raw format tag; see [`Preamble::format`].
    pub fn format_bits(&self) -> u8 {
        self.bits >> Self::FORMAT_SHIFT
    }

    pub fn format(&self) -> Result<FontFormat, ReadError> {
        FontFormat::try_from(self.format_bits()).map_err(|e| ReadError::InvalidFormat(e.0))
    }
}

impl std::fmt::Debug for Preamble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preamble")
            .field("marker", &String::from_utf8_lossy(&self.marker))
            .field("face_count", &self.face_count)
            .field("version", &self.version())
            .field("format", &self.format_bits())
            .finish()
    }
}

/// The preamble plus the per face point sizes and file offsets.
#[derive(Clone, Debug)]
pub struct FileHeader<'a> {
    preamble: &'a Preamble,
    format: FontFormat,
    point_sizes: &'a [u8],
    face_offsets: &'a [LittleEndian<u32>],
    end: usize,
}

impl<'a> FileHeader<'a> {
    /// Byte length of the header for the given number of faces.
    pub fn byte_len(face_count: usize) -> usize {
        (Preamble::RAW_BYTE_LEN + face_count).next_multiple_of(4) + 4 * face_count
    }

    pub fn preamble(&self) -> &'a Preamble {
        self.preamble
    }

    pub fn format(&self) -> FontFormat {
        self.format
    }

    pub fn face_count(&self) -> usize {
        self.point_sizes.len()
    }

    /// The point size of each face, as listed in front of the offset table.
    pub fn point_sizes(&self) -> &'a [u8] {
        self.point_sizes
    }

    pub fn face_offsets(&self) -> &'a [LittleEndian<u32>] {
        self.face_offsets
    }

    pub fn face_offset(&self, index: usize) -> Option<usize> {
        self.face_offsets.get(index).map(|off| off.get() as usize)
    }

    /// The position right after the offset table.
    pub fn end(&self) -> usize {
        self.end
    }

    pub(crate) fn read_with_cursor(cursor: &mut Cursor<'a>) -> Result<Self, ReadError> {
        let preamble: &Preamble = cursor.read_ref()?;
        if preamble.marker != IBMF_MARKER {
            return Err(ReadError::InvalidMarker(preamble.marker));
        }
        if preamble.version() != IBMF_VERSION {
            return Err(ReadError::InvalidVersion(preamble.version()));
        }
        let format = preamble.format()?;
        let face_count = preamble.face_count() as usize;
        let point_sizes = cursor.read_array(face_count)?;
        cursor.align_to(4);
        let face_offsets = cursor.read_array(face_count)?;
        Ok(FileHeader {
            preamble,
            format,
            point_sizes,
            face_offsets,
            end: cursor.position(),
        })
    }
}

impl<'a> FontRead<'a> for FileHeader<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Self::read_with_cursor(&mut data.cursor())
    }
}
