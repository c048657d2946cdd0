//! Traits for interpreting font data

use crate::font_data::FontData;
use crate::rle::DecodeError;

/// A type that can be read from raw font data.
///
/// This trait is implemented for all structures that are self-describing: that
/// is, structures that do not require any external state in order to interpret
/// their underlying bytes.
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing validation.
    ///
    /// Implementations are responsible for ensuring the input data is
    /// consistent: that array lengths are not out-of-bounds and that the
    /// recorded positions of sub-structures match where they actually start.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    OutOfBounds,
    InvalidArrayLen,
    /// The file does not start with the `IBMF` marker.
    InvalidMarker([u8; 4]),
    /// The file was written with an unsupported version of the format.
    InvalidVersion(u8),
    /// The character set model is unknown.
    InvalidFormat(u8),
    /// The requested operation is not available for this font format.
    UnsupportedFormat(types::FontFormat),
    InvalidFaceIndex(usize),
    /// A structure was not found where the file says it starts.
    OffsetMismatch {
        expected: usize,
        actual: usize,
    },
    /// A face does not have the same number of glyphs as the first one.
    GlyphCountMismatch {
        face: usize,
        expected: u16,
        actual: u16,
    },
    /// The plane and bundle tables do not describe a one-to-one mapping.
    InconsistentPlanes(types::GlyphCode),
    /// A glyph's ligature/kerning program could not be walked.
    MalformedLigKern(&'static str),
    /// A glyph's compressed bitmap could not be decoded.
    MalformedBitmap {
        glyph: types::GlyphCode,
        error: DecodeError,
    },
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length not a multiple of item size")
            }
            ReadError::InvalidMarker(marker) => {
                write!(f, "Invalid file marker {:?}", marker.escape_ascii().to_string())
            }
            ReadError::InvalidVersion(version) => write!(f, "Unsupported version {version}"),
            ReadError::InvalidFormat(format) => write!(f, "Invalid font format '{format}'"),
            ReadError::UnsupportedFormat(format) => {
                write!(f, "Operation not supported for {format} fonts")
            }
            ReadError::InvalidFaceIndex(ix) => write!(f, "Invalid face index {ix}"),
            ReadError::OffsetMismatch { expected, actual } => write!(
                f,
                "Expected data at offset 0x{expected:X}, found it at 0x{actual:X}"
            ),
            ReadError::GlyphCountMismatch {
                face,
                expected,
                actual,
            } => write!(
                f,
                "Face {face} has {actual} glyphs, expected {expected} like the first face"
            ),
            ReadError::InconsistentPlanes(code) => {
                write!(f, "Plane tables do not map {code} back to itself")
            }
            ReadError::MalformedLigKern(msg) => write!(f, "Malformed lig/kern program: '{msg}'"),
            ReadError::MalformedBitmap { glyph, error } => {
                write!(f, "Malformed bitmap for {glyph}: {error}")
            }
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::MalformedBitmap { error, .. } => Some(error),
            _ => None,
        }
    }
}
